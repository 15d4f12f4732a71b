use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tornado_alley_core::{
    EfCap, MapBounds, MotionPreset, PerlinField, SpawnTuning, TornadoId, Vec2,
};
use tornado_alley_system_dynamics::{Advance, SpawnContext, StepContext, Tornado};

fn contexts(preset: MotionPreset) -> (SpawnContext, StepContext) {
    let spawn = SpawnContext {
        spawn: SpawnTuning::default(),
        motion: preset.motion(),
        bounds: MapBounds::new(800.0, 600.0),
        ef_cap: EfCap::MAX,
    };
    let step = StepContext {
        motion: preset.motion(),
        min_speed: 40.0,
        wobble: 0.5,
        ef_cap: EfCap::MAX,
    };
    (spawn, step)
}

fn replay(seed: u64) -> Vec<Advance> {
    let (spawn, step) = contexts(MotionPreset::Standard);
    let noise = PerlinField::new(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tornado = Tornado::autonomous(TornadoId::new(1), &spawn, &mut rng);

    let mut log = Vec::new();
    while tornado.is_alive() {
        log.push(tornado.advance(&step, &noise));
        if let Some(cause) = tornado.enforce_bounds(spawn.bounds) {
            log.push(Advance::Dissipated(cause));
        }
    }
    log
}

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn every_run_ends_with_a_dissipation() {
    for seed in 0..8 {
        let log = replay(seed);
        assert!(matches!(log.last(), Some(Advance::Dissipated(_))));
        assert_eq!(
            log.iter()
                .filter(|advance| matches!(advance, Advance::Dissipated(_)))
                .count(),
            1
        );
    }
}

#[test]
fn classic_preset_moves_twice_as_far_per_tick() {
    let start = Vec2::new(400.0, 300.0);
    let mut distances = Vec::new();
    for preset in [MotionPreset::Standard, MotionPreset::Classic] {
        let (spawn, step) = contexts(preset);
        let noise = PerlinField::new(21);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut tornado = Tornado::manual(TornadoId::new(1), start, 150.0, 1.0, &spawn, &mut rng);
        let Advance::Moved(motion) = tornado.advance(&step, &noise) else {
            panic!("fresh tornado should move");
        };
        distances.push(motion.from.distance(motion.to));
    }
    assert!((distances[1] - distances[0] * 2.0).abs() < 1e-4);
}

#[test]
fn capped_runs_never_report_tiers_above_the_cap() {
    let (spawn, step) = contexts(MotionPreset::Standard);
    let cap = EfCap::new(1).expect("valid cap");
    let spawn = SpawnContext {
        ef_cap: cap,
        ..spawn
    };
    let step = StepContext {
        ef_cap: cap,
        ..step
    };
    let noise = PerlinField::new(4);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    for index in 0..20 {
        let mut tornado = Tornado::autonomous(TornadoId::new(index + 1), &spawn, &mut rng);
        assert!(tornado.potential_max_wind() <= 111.0);
        while tornado.is_alive() {
            if let Advance::Moved(motion) = tornado.advance(&step, &noise) {
                assert!(cap.allows(motion.rating));
            }
            let _ = tornado.enforce_bounds(spawn.bounds);
        }
    }
}
