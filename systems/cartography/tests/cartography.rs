use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tornado_alley_core::{MapBounds, MapMode, MapTuning, NoiseField, PerlinField};
use tornado_alley_system_cartography::{is_habitable, MapLayout};

fn layout(seed: u64) -> MapLayout {
    let noise = PerlinField::new(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    MapLayout::generate(
        MapMode::Procedural,
        MapBounds::new(320.0, 240.0),
        &MapTuning::default(),
        &noise,
        &mut rng,
    )
}

#[test]
fn procedural_layout_is_reproducible() {
    assert_eq!(layout(77), layout(77));
}

#[test]
fn generated_cities_sit_on_habitable_land() {
    let tuning = MapTuning::default();
    let map = layout(31);
    let noise = PerlinField::new(31);
    let terrain = map.terrain.as_ref().expect("procedural map has terrain");
    assert_eq!(terrain.cells().len(), 320 * 240);

    for city in &map.cities {
        let position = city.position();
        let sample = noise.sample_2d(position.x * tuning.noise_scale, position.y * tuning.noise_scale);
        assert!(is_habitable(sample, &tuning));
        assert_ne!(terrain.terrain_at(position), None);
    }
    if map.cities.len() > 1 {
        assert_eq!(map.roads.len(), map.cities.len() - 1);
    }
}
