//! Clock Module
//!
//! Monotonic time source for entry freshness, swappable in tests.

use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::lock::mutex_lock;

const SOURCE: &str = "cache::clock";

/// Source of monotonic timestamps for the entry store.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic TTL tests.
///
/// Starts at the instant it was created and only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *mutex_lock(&self.elapsed, SOURCE, "advance") += by;
    }

    /// Sets the time elapsed since creation. Moving backwards is ignored.
    pub fn set_elapsed(&self, elapsed: Duration) {
        let mut current = mutex_lock(&self.elapsed, SOURCE, "set_elapsed");
        if elapsed > *current {
            *current = elapsed;
        }
    }

    pub fn elapsed(&self) -> Duration {
        *mutex_lock(&self.elapsed, SOURCE, "elapsed")
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
