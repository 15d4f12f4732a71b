#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map data consumed by the simulation: terrain, cities and roads.
//!
//! The simulation only reads city positions, radii and populations; terrain
//! and roads exist for rendering and for the map editor.

pub mod roads;
pub mod settlements;
pub mod terrain;

use rand::Rng;
use tornado_alley_core::{City, MapBounds, MapMode, MapTuning, NoiseField, Road};

pub use roads::{minimum_spanning_roads, road_between};
pub use settlements::{nearest_city, place_cities, place_custom_city, CITY_NAMES};
pub use terrain::{classify_sample, is_habitable, TerrainMap};

/// Complete map layer produced for a map mode.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    /// Terrain raster, present only for procedural maps.
    pub terrain: Option<TerrainMap>,
    /// Cities in placement order.
    pub cities: Vec<City>,
    /// Road network.
    pub roads: Vec<Road>,
}

impl MapLayout {
    /// Generates the layers the mode calls for.
    pub fn generate<N, R>(
        mode: MapMode,
        bounds: MapBounds,
        tuning: &MapTuning,
        noise: &N,
        rng: &mut R,
    ) -> Self
    where
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let terrain = mode
            .has_terrain()
            .then(|| TerrainMap::generate(bounds, tuning, noise));
        let cities = if mode.has_cities() {
            place_cities(bounds, tuning, noise, rng)
        } else {
            Vec::new()
        };
        let roads = minimum_spanning_roads(&cities);
        Self {
            terrain,
            cities,
            roads,
        }
    }
}
