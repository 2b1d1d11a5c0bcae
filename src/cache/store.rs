//! Cache Store Module
//!
//! Bounded entry store combining a HashMap with LRU tracking and lazy TTL
//! expiration, all behind one lock.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;

use super::lock::mutex_lock;
use super::stats::Removal;
use super::{CacheEntry, CacheStats, Clock, LruTracker, SystemClock};
use crate::content::{ContentKey, ContentRecord};

const SOURCE: &str = "cache::store";

/// Map and recency list. They must only change together.
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<ContentKey, CacheEntry>,
    lru: LruTracker<ContentKey>,
    stats: CacheStats,
}

impl StoreState {
    fn remove(&mut self, key: &ContentKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(entry.slot);
        Some(entry)
    }

    fn sync_len(&mut self) {
        self.stats.set_total_entries(self.entries.len());
    }
}

// == Entry Store ==
/// Thread-safe, bounded key → record store with LRU eviction and TTL-aware
/// lookup.
///
/// Every operation takes the same lock and does O(1) work under it, apart
/// from the administrative [`clear`](Self::clear) and
/// [`purge_expired`](Self::purge_expired). Nothing here does I/O and nothing
/// here fails.
#[derive(Debug)]
pub struct EntryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_entries: NonZeroUsize,
}

impl EntryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` records for `ttl` each.
    pub fn new(max_entries: NonZeroUsize, ttl: Duration) -> Self {
        Self::with_clock(max_entries, ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: NonZeroUsize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
            ttl,
            max_entries,
        }
    }

    // == Get ==
    /// Returns the record for `key` if present and fresh, marking it most
    /// recently used. A stale entry is dropped and reported as absent.
    pub fn get(&self, key: &ContentKey) -> Option<Arc<ContentRecord>> {
        let now = self.clock.now();
        let mut guard = self.lock("get");
        let state = &mut *guard;

        let lookup = state
            .entries
            .get(key)
            .map(|entry| (entry.is_fresh(now, self.ttl), entry.slot, Arc::clone(&entry.record)));

        match lookup {
            Some((true, slot, record)) => {
                state.lru.touch(slot);
                state.stats.record_lookup(true);
                debug!(key = %key, "cache hit");
                Some(record)
            }
            Some((false, _, _)) => {
                state.remove(key);
                state.stats.record_removals(Removal::Expired, 1);
                state.stats.record_lookup(false);
                state.sync_len();
                debug!(key = %key, "cache entry expired");
                None
            }
            None => {
                state.stats.record_lookup(false);
                debug!(key = %key, "cache miss");
                None
            }
        }
    }

    // == Put ==
    /// Inserts or replaces the record for `key`, stamping it with the current
    /// time and marking it most recently used.
    ///
    /// When a new key would exceed capacity, the least recently used entry is
    /// evicted first; its key is returned.
    pub fn put(
        &self,
        key: ContentKey,
        record: impl Into<Arc<ContentRecord>>,
    ) -> Option<ContentKey> {
        let record = record.into();
        let now = self.clock.now();
        let mut guard = self.lock("put");
        let state = &mut *guard;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.record = record;
            entry.inserted_at = now;
            state.lru.touch(entry.slot);
            return None;
        }

        let mut evicted = None;
        if state.entries.len() >= self.max_entries.get() {
            if let Some(victim) = state.lru.evict_oldest() {
                state.entries.remove(&victim);
                state.stats.record_removals(Removal::Evicted, 1);
                debug!(key = %victim, "evicted least recently used entry");
                evicted = Some(victim);
            }
        }

        let slot = state.lru.push_front(key.clone());
        state.entries.insert(key, CacheEntry::new(record, now, slot));
        state.sync_len();
        evicted
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &ContentKey) -> bool {
        let mut guard = self.lock("invalidate");
        let removed = guard.remove(key).is_some();
        if removed {
            guard.stats.record_removals(Removal::Invalidated, 1);
            guard.sync_len();
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut guard = self.lock("clear");
        let count = guard.entries.len();
        guard.entries.clear();
        guard.lru.clear();
        guard.stats.record_removals(Removal::Invalidated, count);
        guard.sync_len();
        count
    }

    // == Purge Expired ==
    /// Drops all stale entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.lock("purge_expired");

        let expired: Vec<ContentKey> = guard
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            guard.remove(key);
        }
        guard.stats.record_removals(Removal::Expired, expired.len());
        guard.sync_len();
        expired.len()
    }

    /// Keys from most to least recently used, stale entries included.
    pub fn keys_by_recency(&self) -> Vec<ContentKey> {
        self.lock("keys_by_recency").lru.iter().cloned().collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock("stats").stats.clone()
    }

    // == Length ==
    /// Number of stored entries, counting ones that are stale but not yet
    /// dropped.
    pub fn len(&self) -> usize {
        self.lock("len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, StoreState> {
        mutex_lock(&self.state, SOURCE, op)
    }
}
