//! Expiring Cache
//!
//! Concurrent handle over a [`CacheStore`] with its own background reaper.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_reaper_task, ReaperHandle};

// == Expiring Cache ==
/// Time-expiring key/value cache for byte payloads.
///
/// Every entry lives for at least `eviction_interval` and is removed by the
/// first sweep after it reaches that age, so an entry may survive for up to
/// twice the interval. Share it between tasks with an `Arc`. Dropping the
/// cache stops its reaper.
#[derive(Debug)]
pub struct ExpiringCache {
    store: Arc<RwLock<CacheStore>>,
    reaper: ReaperHandle,
    eviction_interval: Duration,
}

impl ExpiringCache {
    // == Constructor ==
    /// Creates an empty cache and starts its background reaper.
    ///
    /// Fails with `InvalidInterval` for a zero interval and with
    /// `RuntimeUnavailable` when called outside a tokio runtime.
    pub fn new(eviction_interval: Duration) -> Result<Self> {
        if eviction_interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;

        let store = Arc::new(RwLock::new(CacheStore::new()));
        let reaper = spawn_reaper_task(store.clone(), eviction_interval);

        Ok(Self {
            store,
            reaper,
            eviction_interval,
        })
    }

    // == Add ==
    /// Stores `value` under `key` unless the key is already populated.
    ///
    /// `AlreadyExists` means another caller got there first; the existing
    /// value is kept and the error is safe to ignore.
    pub async fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        let mut store = self.store.write().await;
        store.add(key, value)
    }

    // == Get ==
    /// Returns a copy of the bytes stored under `key`, or `None`.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        // Write lock: lookups update the hit/miss counters.
        let mut store = self.store.write().await;
        store.get(key)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub fn eviction_interval(&self) -> Duration {
        self.eviction_interval
    }

    // == Teardown ==
    /// Asks the reaper to stop. Entries already stored stay readable but are
    /// no longer swept.
    pub fn stop_reaper(&self) {
        debug!("Stopping cache reaper");
        self.reaper.stop();
    }

    pub fn is_reaper_running(&self) -> bool {
        !self.reaper.is_finished()
    }

    /// Stops the reaper and waits for it to exit, consuming the cache.
    pub async fn shutdown(self) {
        self.reaper.shutdown().await;
    }
}
