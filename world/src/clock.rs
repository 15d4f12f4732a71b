//! Simulated time of day.

use std::time::Duration;

const MINUTES_PER_DAY: u32 = 24 * 60;
const MINUTE_PERIOD: Duration = Duration::from_secs(1);

/// Clock advancing one simulated minute per elapsed wall-clock second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationClock {
    minute_of_day: u32,
    carry: Duration,
}

impl SimulationClock {
    /// Minutes since midnight.
    #[must_use]
    pub const fn minute_of_day(&self) -> u32 {
        self.minute_of_day
    }

    /// Hour and minute components.
    #[must_use]
    pub const fn hours_minutes(&self) -> (u32, u32) {
        (self.minute_of_day / 60, self.minute_of_day % 60)
    }

    pub(crate) fn restart(&mut self, minute_of_day: u32) {
        self.minute_of_day = minute_of_day % MINUTES_PER_DAY;
        self.carry = Duration::ZERO;
    }

    /// Accumulates elapsed time, returning whether the displayed minute changed.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.carry = self.carry.saturating_add(dt);
        let mut changed = false;
        while self.carry >= MINUTE_PERIOD {
            self.carry -= MINUTE_PERIOD;
            self.minute_of_day = (self.minute_of_day + 1) % MINUTES_PER_DAY;
            changed = true;
        }
        changed
    }

    pub(crate) const fn minutes_per_day() -> u32 {
        MINUTES_PER_DAY
    }
}
