//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache is in use.
//!
//! # Tasks
//! - Expiry sweep: drops stale entries so they don't sit in memory until read

mod sweeper;

pub use sweeper::spawn_sweeper;
