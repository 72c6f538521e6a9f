//! Time source for commits

use chrono::{DateTime, Local};

/// Where the current time comes from
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: std::sync::Arc<std::sync::Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: std::sync::Arc::new(std::sync::Mutex::new(now)) }
    }

    /// Move to a new instant; clones see the change
    pub fn set(&self, now: DateTime<Local>) {
        if let Ok(mut current) = self.now.lock() {
            *current = now;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Local::now())
    }
}
