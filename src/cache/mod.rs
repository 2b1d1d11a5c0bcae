//! Cache Module
//!
//! In-memory content caching with TTL expiration and LRU eviction.

mod clock;
mod content_cache;
mod entry;
mod lock;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use content_cache::{ContentCache, ContentCacheStats};
pub use entry::CacheEntry;
pub use lru::{LruTracker, Slot};
pub use stats::{CacheStats, Removal};
pub use store::EntryStore;
