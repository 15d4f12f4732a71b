use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tornado_alley_core::{CasualtyTuning, City, CityId, EfRating, TornadoId, Vec2};
use tornado_alley_system_casualties::{CasualtyModel, CityStrike, Strike};

fn city_at(id: u32, position: Vec2) -> City {
    City::new(CityId::new(id), format!("City {id}"), position, 250_000, 8.0)
}

fn strike_at(position: Vec2, wind_speed: f32) -> Strike {
    Strike {
        tornado: TornadoId::new(1),
        position,
        wind_speed,
        rating: EfRating::from_wind_speed(wind_speed),
        render_width: 8.0,
    }
}

#[test]
fn weak_winds_never_touch_cities() {
    let model = CasualtyModel::new(CasualtyTuning::default());
    let mut cities = vec![city_at(1, Vec2::new(100.0, 100.0))];
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut out = Vec::new();

    model.assess(&strike_at(Vec2::new(100.0, 100.0), 39.9), &mut cities, 10, &mut rng, &mut out);

    assert!(out.is_empty());
    assert!(!cities[0].is_hit());
    assert_eq!(cities[0].last_hit_tick(), None);
}

#[test]
fn only_cities_strictly_inside_the_area_are_struck() {
    let model = CasualtyModel::new(CasualtyTuning::default());
    let mut cities = vec![
        city_at(1, Vec2::new(100.0, 100.0)),
        city_at(2, Vec2::new(124.0, 100.0)),
        city_at(3, Vec2::new(300.0, 300.0)),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut out = Vec::new();

    model.assess(&strike_at(Vec2::new(100.0, 100.0), 150.0), &mut cities, 5, &mut rng, &mut out);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].city, CityId::new(1));
    assert!(out[0].casualties >= 1);
    assert_eq!(out[0].cumulative, u64::from(out[0].casualties));
    assert!((out[0].coverage - 1.0 / 9.0).abs() < 1e-6);
    assert!(cities[0].is_hit());
    assert!(!cities[1].is_hit());
    assert!(!cities[2].is_hit());
}

#[test]
fn cooldown_blocks_repeat_strikes_without_touching_state() {
    let model = CasualtyModel::new(CasualtyTuning::default());
    let mut cities = vec![city_at(1, Vec2::new(100.0, 100.0))];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let strike = strike_at(Vec2::new(105.0, 100.0), 180.0);
    let mut out: Vec<CityStrike> = Vec::new();

    model.assess(&strike, &mut cities, 100, &mut rng, &mut out);
    assert_eq!(out.len(), 1);
    let after_first = cities[0].clone();

    for tick in 101..130 {
        model.assess(&strike, &mut cities, tick, &mut rng, &mut out);
    }
    assert_eq!(out.len(), 1);
    assert_eq!(cities[0], after_first);

    model.assess(&strike, &mut cities, 130, &mut rng, &mut out);
    assert_eq!(out.len(), 2);
    assert_eq!(cities[0].last_hit_tick(), Some(130));
    assert_eq!(
        out[1].cumulative,
        u64::from(out[0].casualties) + u64::from(out[1].casualties)
    );
}
