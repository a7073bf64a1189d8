//! Virtual simulation clock.
//!
//! Records are stamped from this clock rather than wall-clock time, so the
//! generated stream can cover hours of simulated traffic in seconds of real
//! time. The scheduler owns the clock and is the only writer.

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Monotonically advancing virtual timestamp, seeded from local wall-clock
/// time at construction.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: NaiveDateTime,
}

impl SimClock {
    /// Start the clock at the current local time.
    pub fn start_now() -> Self {
        Self {
            now: Local::now().naive_local(),
        }
    }

    /// Start the clock at an explicit instant.
    pub fn starting_at(instant: NaiveDateTime) -> Self {
        Self { now: instant }
    }

    /// Current virtual time.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Advance the clock. Negative deltas are ignored so the clock is
    /// non-decreasing by construction.
    pub fn advance(&mut self, delta: TimeDelta) {
        if delta > TimeDelta::zero() {
            self.now += delta;
        }
    }
}
