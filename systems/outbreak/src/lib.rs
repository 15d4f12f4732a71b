#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Outbreak spawner that releases scheduled tornadoes at a fixed cadence.

use std::time::Duration;

use tornado_alley_core::{Command, Event, SpawnKind};

/// Pure system that turns a scheduled outbreak into spawn commands.
///
/// An outbreak starts when the world announces [`Event::OutbreakScheduled`]
/// and ends once every tornado was requested, or earlier when the simulation
/// resets or ends.
#[derive(Debug, Default)]
pub struct Outbreak {
    interval: Duration,
    remaining: u32,
    accumulator: Duration,
}

impl Outbreak {
    /// Consumes world events and emits one spawn command per elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::OutbreakScheduled { count, interval } => {
                    self.remaining = *count;
                    self.interval = *interval;
                    self.accumulator = Duration::ZERO;
                }
                Event::SimulationReset | Event::SimulationEnded { .. } => self.cancel(),
                Event::TimeAdvanced { dt } => self.accumulate(*dt, out),
                _ => {}
            }
        }
    }

    /// Tornadoes still to be spawned.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether an outbreak is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.remaining > 0
    }

    fn accumulate(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if !self.is_active() || self.interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.remaining > 0 && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.remaining -= 1;
            out.push(Command::SpawnTornado {
                kind: SpawnKind::Autonomous,
            });
        }
        if self.remaining == 0 {
            self.accumulator = Duration::ZERO;
        }
    }

    fn cancel(&mut self) {
        self.remaining = 0;
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(count: u32) -> Event {
        Event::OutbreakScheduled {
            count,
            interval: Duration::from_millis(1_000),
        }
    }

    #[test]
    fn idle_without_schedule() {
        let mut outbreak = Outbreak::default();
        let mut commands = Vec::new();
        outbreak.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(10),
            }],
            &mut commands,
        );
        assert!(commands.is_empty());
        assert!(!outbreak.is_active());
    }

    #[test]
    fn zero_interval_never_spawns() {
        let mut outbreak = Outbreak::default();
        let mut commands = Vec::new();
        outbreak.handle(
            &[
                Event::OutbreakScheduled {
                    count: 3,
                    interval: Duration::ZERO,
                },
                Event::TimeAdvanced {
                    dt: Duration::from_secs(5),
                },
            ],
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(outbreak.remaining(), 3);
    }

    #[test]
    fn spawns_stop_when_count_is_exhausted() {
        let mut outbreak = Outbreak::default();
        let mut commands = Vec::new();
        outbreak.handle(
            &[
                scheduled(2),
                Event::TimeAdvanced {
                    dt: Duration::from_secs(30),
                },
            ],
            &mut commands,
        );
        assert_eq!(commands.len(), 2);
        assert!(!outbreak.is_active());
        assert_eq!(outbreak.accumulator, Duration::ZERO);
    }
}
