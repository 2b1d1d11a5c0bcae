//! Cache Statistics Module
//!
//! Counters for lookups and for every way an entry leaves the store.

use serde::Serialize;

/// Why an entry left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Found stale, on read or by the sweeper
    Expired,
    /// Dropped to make room under the capacity bound
    Evicted,
    /// Removed by an explicit invalidate or clear
    Invalidated,
}

// == Cache Stats ==
/// Snapshot of entry store counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered with a fresh entry
    pub hits: u64,
    /// Lookups that found nothing usable, stale entries included
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub invalidations: u64,
    /// Entries held when the snapshot was taken
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_removals(&mut self, reason: Removal, count: usize) {
        let counter = match reason {
            Removal::Expired => &mut self.expirations,
            Removal::Evicted => &mut self.evictions,
            Removal::Invalidated => &mut self.invalidations,
        };
        *counter += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
