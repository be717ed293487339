use crate::models::Timestamp;
use chrono::{Duration, Local, Timelike};
use parking_lot::Mutex;

/// Source of "now" for the engine and the local authority.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Local wall clock, truncated to whole seconds like backend timestamps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.lock() = at;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.now.lock() += Duration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
