//! Per-pixel terrain raster.

use tornado_alley_core::{MapBounds, MapTuning, NoiseField, Terrain, Vec2};

/// Terrain class of a noise sample.
#[must_use]
pub fn classify_sample(sample: f32, tuning: &MapTuning) -> Terrain {
    if sample > tuning.mountain_threshold {
        Terrain::Mountain
    } else if sample > tuning.land_threshold {
        Terrain::Land
    } else {
        Terrain::Water
    }
}

/// Reports whether a noise sample is land suitable for a generated city.
#[must_use]
pub fn is_habitable(sample: f32, tuning: &MapTuning) -> bool {
    sample > tuning.land_threshold && sample < tuning.mountain_threshold
}

/// Terrain grid with one cell per map pixel, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainMap {
    width: u32,
    height: u32,
    cells: Vec<Terrain>,
}

impl TerrainMap {
    /// Samples the noise field over every pixel of the map.
    pub fn generate<N>(bounds: MapBounds, tuning: &MapTuning, noise: &N) -> Self
    where
        N: NoiseField + ?Sized,
    {
        let width = pixel_extent(bounds.width());
        let height = pixel_extent(bounds.height());
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let sample =
                    noise.sample_2d(x as f32 * tuning.noise_scale, y as f32 * tuning.noise_scale);
                cells.push(classify_sample(sample, tuning));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[Terrain] {
        &self.cells
    }

    /// Terrain under a map position, or `None` off the raster.
    #[must_use]
    pub fn terrain_at(&self, point: Vec2) -> Option<Terrain> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        self.index(x, y).map(|index| self.cells[index])
    }

    /// Writes `terrain` into every cell whose centre lies within `radius` of `center`.
    ///
    /// Returns the number of cells that changed.
    pub fn paint(&mut self, center: Vec2, radius: f32, terrain: Terrain) -> usize {
        if radius <= 0.0 || self.cells.is_empty() {
            return 0;
        }

        let min_x = (center.x - radius).floor().max(0.0) as u32;
        let min_y = (center.y - radius).floor().max(0.0) as u32;
        let max_x = ((center.x + radius).ceil().max(0.0) as u32).min(self.width - 1);
        let max_y = ((center.y + radius).ceil().max(0.0) as u32).min(self.height - 1);

        let mut changed = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let cell_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if cell_center.distance(center) > radius {
                    continue;
                }
                if let Some(index) = self.index(x, y) {
                    if self.cells[index] != terrain {
                        self.cells[index] = terrain;
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn pixel_extent(length: f32) -> u32 {
    if length.is_finite() && length > 0.0 {
        length.ceil() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornado_alley_core::ConstantField;

    #[test]
    fn thresholds_split_water_land_and_mountain() {
        let tuning = MapTuning::default();
        assert_eq!(classify_sample(0.35, &tuning), Terrain::Water);
        assert_eq!(classify_sample(0.36, &tuning), Terrain::Land);
        assert_eq!(classify_sample(0.65, &tuning), Terrain::Land);
        assert_eq!(classify_sample(0.66, &tuning), Terrain::Mountain);
        assert!(is_habitable(0.5, &tuning));
        assert!(!is_habitable(0.65, &tuning));
        assert!(!is_habitable(0.35, &tuning));
    }

    #[test]
    fn constant_noise_yields_uniform_map() {
        let map = TerrainMap::generate(
            MapBounds::new(40.0, 30.0),
            &MapTuning::default(),
            &ConstantField(0.5),
        );
        assert_eq!(map.cells().len(), 1_200);
        assert!(map.cells().iter().all(|cell| *cell == Terrain::Land));
        assert_eq!(map.terrain_at(Vec2::new(39.5, 29.5)), Some(Terrain::Land));
        assert_eq!(map.terrain_at(Vec2::new(40.0, 10.0)), None);
        assert_eq!(map.terrain_at(Vec2::new(-1.0, 10.0)), None);
    }

    #[test]
    fn painting_fills_a_disc_and_clips_at_edges() {
        let mut map = TerrainMap::generate(
            MapBounds::new(100.0, 100.0),
            &MapTuning::default(),
            &ConstantField(0.0),
        );
        let changed = map.paint(Vec2::new(50.0, 50.0), 30.0, Terrain::Mountain);
        assert!(changed > 2_700 && changed < 2_950, "painted {changed} cells");
        assert_eq!(map.terrain_at(Vec2::new(50.0, 50.0)), Some(Terrain::Mountain));
        assert_eq!(map.terrain_at(Vec2::new(50.0, 85.0)), Some(Terrain::Water));
        assert_eq!(map.paint(Vec2::new(50.0, 50.0), 30.0, Terrain::Mountain), 0);

        let corner = map.paint(Vec2::new(0.0, 0.0), 30.0, Terrain::Land);
        assert!(corner > 0);
        assert_eq!(map.terrain_at(Vec2::new(1.0, 1.0)), Some(Terrain::Land));
    }
}
