//! Garden Cache - a read-through cache for markdown content
//!
//! Loads markdown files with YAML frontmatter, validates them against the
//! garden schema, and serves them from memory with TTL expiration and LRU
//! eviction.

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod protocol;
pub mod tasks;

pub use cache::{ContentCache, ContentCacheStats, EntryStore};
pub use config::Config;
pub use content::{ContentKey, ContentRecord};
pub use error::{ContentError, Result};
pub use tasks::spawn_sweeper;
