//! Spawn-time randomisation of tornado parameters.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rand::Rng;
use tornado_alley_core::{EfCap, MapBounds, MotionTuning, SpawnTuning, Vec2};

/// Parameters consulted when a tornado is created.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext {
    /// Spawn randomisation constants.
    pub spawn: SpawnTuning,
    /// Motion constants bounding the track width.
    pub motion: MotionTuning,
    /// Map dimensions used for positions and edge-aware headings.
    pub bounds: MapBounds,
    /// EF cap in effect when the tornado spawns.
    pub ef_cap: EfCap,
}

/// Wind ceiling drawn for a new tornado.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindCeiling {
    /// Highest wind speed (mph) the tornado's evolution can map onto.
    pub potential_max_wind: f32,
    /// Whether the ceiling was forced into the extreme EF6 range.
    pub extreme: bool,
}

/// Draws a tornado's potential maximum wind.
///
/// The larger of two uniform draws biases toward strong ceilings. The result
/// is capped by the spawn ceiling and by the wind implied by `cap`, except for
/// the rare extreme roll, which is only possible when the cap allows EF6.
pub fn draw_wind_ceiling<R>(spawn: &SpawnTuning, cap: EfCap, rng: &mut R) -> WindCeiling
where
    R: Rng + ?Sized,
{
    let first = uniform(rng, spawn.potential_floor, spawn.max_speed);
    let second = uniform(rng, spawn.potential_floor, spawn.max_speed);
    let mut potential_max_wind = first
        .max(second)
        .min(spawn.max_spawn_wind)
        .min(cap.wind_ceiling(spawn.max_speed));

    let roll: f64 = rng.gen();
    let extreme = roll < spawn.ef6_chance && cap == EfCap::MAX;
    if extreme {
        potential_max_wind = uniform(rng, spawn.extreme_floor, spawn.max_speed);
    }

    WindCeiling {
        potential_max_wind,
        extreme,
    }
}

/// Initial heading (radians) for a tornado spawned at `position`.
///
/// Tornadoes spawned within `edge_buffer` of an edge head inward, diagonally
/// when near a corner. Elsewhere they head north-east.
#[must_use]
pub fn initial_heading(position: Vec2, bounds: MapBounds, edge_buffer: f32) -> f32 {
    let near_top = position.y < edge_buffer;
    let near_bottom = position.y > bounds.height() - edge_buffer;
    let near_left = position.x < edge_buffer;
    let near_right = position.x > bounds.width() - edge_buffer;

    match (near_top, near_bottom, near_left, near_right) {
        (true, _, true, _) => FRAC_PI_4,
        (true, _, _, true) => 3.0 * FRAC_PI_4,
        (_, true, true, _) => -FRAC_PI_4,
        (_, true, _, true) => -3.0 * FRAC_PI_4,
        (true, _, _, _) => FRAC_PI_2,
        (_, true, _, _) => -FRAC_PI_2,
        (_, _, true, _) => 0.0,
        (_, _, _, true) => PI,
        _ => -FRAC_PI_4,
    }
}

/// Draws a value from `[low, high)`, returning `low` for empty ranges.
pub(crate) fn uniform<R>(rng: &mut R, low: f32, high: f32) -> f32
where
    R: Rng + ?Sized,
{
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn corners_and_edges_point_inward() {
        let bounds = MapBounds::new(800.0, 600.0);
        assert_eq!(initial_heading(Vec2::new(10.0, 10.0), bounds, 150.0), FRAC_PI_4);
        assert_eq!(
            initial_heading(Vec2::new(790.0, 10.0), bounds, 150.0),
            3.0 * FRAC_PI_4
        );
        assert_eq!(initial_heading(Vec2::new(10.0, 590.0), bounds, 150.0), -FRAC_PI_4);
        assert_eq!(
            initial_heading(Vec2::new(790.0, 590.0), bounds, 150.0),
            -3.0 * FRAC_PI_4
        );
        assert_eq!(initial_heading(Vec2::new(400.0, 10.0), bounds, 150.0), FRAC_PI_2);
        assert_eq!(initial_heading(Vec2::new(400.0, 590.0), bounds, 150.0), -FRAC_PI_2);
        assert_eq!(initial_heading(Vec2::new(10.0, 300.0), bounds, 150.0), 0.0);
        assert_eq!(initial_heading(Vec2::new(790.0, 300.0), bounds, 150.0), PI);
        assert_eq!(initial_heading(Vec2::new(400.0, 300.0), bounds, 150.0), -FRAC_PI_4);
    }

    #[test]
    fn wind_ceiling_respects_spawn_and_cap_limits() {
        let spawn = SpawnTuning {
            ef6_chance: 0.0,
            ..SpawnTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let cap = EfCap::new(3).expect("valid cap");
        for _ in 0..500 {
            let ceiling = draw_wind_ceiling(&spawn, cap, &mut rng);
            assert!(!ceiling.extreme);
            assert!(ceiling.potential_max_wind >= spawn.potential_floor);
            assert!(ceiling.potential_max_wind <= 166.0);
        }
        for _ in 0..500 {
            let ceiling = draw_wind_ceiling(&spawn, EfCap::MAX, &mut rng);
            assert!(ceiling.potential_max_wind <= spawn.max_spawn_wind);
        }
    }

    #[test]
    fn extreme_roll_requires_ef6_cap() {
        let spawn = SpawnTuning {
            ef6_chance: 1.0,
            ..SpawnTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let extreme = draw_wind_ceiling(&spawn, EfCap::MAX, &mut rng);
        assert!(extreme.extreme);
        assert!(extreme.potential_max_wind >= 320.0);

        let capped = draw_wind_ceiling(&spawn, EfCap::new(5).expect("valid"), &mut rng);
        assert!(!capped.extreme);
        assert!(capped.potential_max_wind <= spawn.max_spawn_wind);
    }

    #[test]
    fn uniform_handles_empty_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
        let value = uniform(&mut rng, 1.0, 2.0);
        assert!((1.0..2.0).contains(&value));
    }
}
