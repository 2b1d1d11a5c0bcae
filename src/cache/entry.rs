//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::lru::Slot;
use crate::content::ContentRecord;

// == Cache Entry ==
/// A cached record plus the metadata the store needs to expire and order it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored record
    pub record: Arc<ContentRecord>,
    /// When the record was inserted (monotonic)
    pub inserted_at: Instant,
    /// Position in the recency list
    pub(crate) slot: Slot,
}

impl CacheEntry {
    // == Constructor ==
    pub(crate) fn new(record: Arc<ContentRecord>, inserted_at: Instant, slot: Slot) -> Self {
        Self {
            record,
            inserted_at,
            slot,
        }
    }

    /// Time since insertion. Zero if `now` is earlier than `inserted_at`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Fresh ==
    /// An entry is fresh while its age is strictly below `ttl`; at exactly
    /// `ttl` it is stale.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
