//! Expiry Sweep Task
//!
//! Background task that periodically purges stale entries from the store.
//! Reads already treat stale entries as misses, so the sweep only reclaims
//! memory held by keys nobody asks for.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntryStore;

/// Spawns a background task that purges expired entries every `interval`.
///
/// The returned handle should be aborted during shutdown.
///
/// ```ignore
/// let sweeper = spawn_sweeper(Arc::clone(cache.store()), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper(store: Arc<EntryStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?interval, "starting expiry sweeper");

        loop {
            tokio::time::sleep(interval).await;

            // purge_expired holds the store lock for one pass over the map
            let removed = store.purge_expired();

            if removed > 0 {
                info!(removed, remaining = store.len(), "expiry sweep removed stale entries");
            } else {
                debug!("expiry sweep: no stale entries");
            }
        }
    })
}
