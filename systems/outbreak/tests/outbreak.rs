use std::{collections::VecDeque, time::Duration};

use tornado_alley_core::{Command, Event, OutbreakTuning, SimulationConfig, SpawnKind};
use tornado_alley_system_outbreak::Outbreak;
use tornado_alley_world::{self as world, query, World};

const SECOND: Duration = Duration::from_secs(1);

fn certain_outbreak(count: u32) -> SimulationConfig {
    SimulationConfig {
        outbreak: OutbreakTuning {
            chance_per_reset: 1.0,
            spawn_interval_ms: 1_000,
            min_count: count,
            max_count: count,
        },
        ..SimulationConfig::default()
    }
}

fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::TornadoSpawned { .. }))
        .count()
}

#[test]
fn scheduled_outbreak_spawns_its_full_count_then_stops() {
    let mut world = World::new(certain_outbreak(3), 8);
    let mut outbreak = Outbreak::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ResetSimulation, &mut events);
    assert!(events.contains(&Event::OutbreakScheduled {
        count: 3,
        interval: SECOND,
    }));
    let initial = query::tornadoes(&world).len();

    let mut commands = Vec::new();
    outbreak.handle(&events, &mut commands);
    assert!(outbreak.is_active());
    assert!(commands.is_empty());

    let mut queue = VecDeque::new();
    for _ in 0..10 {
        queue.extend(commands.drain(..));
        events.clear();
        world::run_frame(&mut world, &mut queue, SECOND, &mut events);
        outbreak.handle(&events, &mut commands);
    }

    assert!(!outbreak.is_active());
    assert_eq!(query::tornadoes(&world).len(), initial + 3);
}

#[test]
fn reset_cancels_a_pending_outbreak() {
    let mut world = World::new(certain_outbreak(5), 8);
    let mut outbreak = Outbreak::default();
    let mut events = Vec::new();
    let mut commands = Vec::new();
    world::apply(&mut world, Command::ResetSimulation, &mut events);
    outbreak.handle(&events, &mut commands);
    assert_eq!(outbreak.remaining(), 5);

    outbreak.handle(&[Event::SimulationReset], &mut commands);
    assert!(!outbreak.is_active());

    events.clear();
    world::apply(&mut world, Command::Tick { dt: SECOND * 3 }, &mut events);
    outbreak.handle(&events, &mut commands);
    assert!(commands.is_empty());
    assert_eq!(spawned(&events), 0);
}

#[test]
fn simulation_end_stops_the_outbreak() {
    let mut outbreak = Outbreak::default();
    let mut commands = Vec::new();
    outbreak.handle(
        &[
            Event::OutbreakScheduled {
                count: 4,
                interval: SECOND,
            },
            Event::TimeAdvanced { dt: SECOND },
            Event::SimulationEnded {
                total_casualties: 12,
            },
            Event::TimeAdvanced { dt: SECOND * 5 },
        ],
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::SpawnTornado {
            kind: SpawnKind::Autonomous,
        }]
    );
    assert_eq!(outbreak.remaining(), 0);
}
