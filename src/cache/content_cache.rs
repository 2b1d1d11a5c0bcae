//! Content cache facade.
//!
//! The single entry point request handlers use: consult the entry store, and
//! on a miss load, validate and insert. Loading and validation happen outside
//! the store lock, so concurrent misses on one key may each load; the last
//! insert wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::{CacheStats, EntryStore};
use crate::config::Config;
use crate::content::{
    ContentKey, ContentLoader, ContentRecord, ContentValidator, FsLoader, SchemaValidator,
};
use crate::error::{ContentError, Result};

/// Store counters plus loader activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCacheStats {
    #[serde(flatten)]
    pub store: CacheStats,
    /// Loader invocations (misses, stale hits, and forced refreshes)
    pub loads: u64,
    /// Loads that ended in an error and were not cached
    pub load_failures: u64,
}

/// Read-through cache over a content loader and validator.
///
/// Construct one at startup and share it behind an [`Arc`]; there is no
/// global instance.
///
/// ```ignore
/// let cache = Arc::new(ContentCache::from_config(&Config::from_env()));
/// let page = cache.get(&ContentKey::new("notes/rust"))?;
/// ```
#[derive(Debug)]
pub struct ContentCache<L = FsLoader, V = SchemaValidator> {
    loader: L,
    validator: V,
    store: Arc<EntryStore>,
    loads: AtomicU64,
    load_failures: AtomicU64,
}

impl ContentCache {
    /// Filesystem-backed cache using the garden schema.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FsLoader::new(&config.content_root),
            SchemaValidator::new(),
            EntryStore::new(config.max_entries, config.ttl),
        )
    }
}

impl<L, V> ContentCache<L, V>
where
    L: ContentLoader,
    V: ContentValidator,
{
    pub fn new(loader: L, validator: V, store: EntryStore) -> Self {
        Self {
            loader,
            validator,
            store: Arc::new(store),
            loads: AtomicU64::new(0),
            load_failures: AtomicU64::new(0),
        }
    }

    /// Returns the validated record for `key`, loading it on a miss.
    ///
    /// Failed loads are never cached; the next call tries again.
    pub fn get(&self, key: &ContentKey) -> Result<Arc<ContentRecord>> {
        if let Some(record) = self.store.get(key) {
            return Ok(record);
        }
        self.load_and_store(key)
    }

    /// Reloads `key` regardless of what is cached.
    ///
    /// The old entry is dropped first, so a failed refresh leaves the key
    /// uncached rather than serving the superseded record.
    pub fn refresh(&self, key: &ContentKey) -> Result<Arc<ContentRecord>> {
        self.store.invalidate(key);
        self.load_and_store(key)
    }

    /// Drops the cached entry for `key`, if any.
    pub fn invalidate(&self, key: &ContentKey) -> bool {
        self.store.invalidate(key)
    }

    /// Drops every cached entry. Returns how many were removed.
    pub fn invalidate_all(&self) -> usize {
        self.store.clear()
    }

    pub fn stats(&self) -> ContentCacheStats {
        ContentCacheStats {
            store: self.store.stats(),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
        }
    }

    /// The underlying entry store, e.g. for the background sweeper.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    fn load_and_store(&self, key: &ContentKey) -> Result<Arc<ContentRecord>> {
        self.loads.fetch_add(1, Ordering::Relaxed);

        let record = match self.load_record(key) {
            Ok(record) => Arc::new(record),
            Err(err) => {
                self.load_failures.fetch_add(1, Ordering::Relaxed);
                match &err {
                    ContentError::NotFound(_) => debug!(key = %key, "content not found"),
                    other => warn!(key = %key, kind = other.kind(), "content load failed: {}", other),
                }
                return Err(err);
            }
        };

        self.store.put(key.clone(), Arc::clone(&record));
        debug!(key = %key, "content loaded and cached");
        Ok(record)
    }

    fn load_record(&self, key: &ContentKey) -> Result<ContentRecord> {
        let raw = self
            .loader
            .load(key)
            .map_err(|err| ContentError::from_load(key, err))?;

        self.validator
            .validate(raw)
            .map_err(|err| ContentError::from_validation(key, err))
    }
}
