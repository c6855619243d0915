//! Cache Store Module
//!
//! Synchronous storage engine: the key map plus its counters. Callers are
//! expected to serialize access (see `ExpiringCache`).

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key to entry mapping with insert-once semantics.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Add ==
    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// An occupied key yields `CacheError::AlreadyExists` and the existing
    /// entry is left untouched. Empty keys and empty values are legal.
    pub fn add(&mut self, key: String, value: Vec<u8>) -> Result<()> {
        self.add_at(key, value, Instant::now())
    }

    pub(crate) fn add_at(&mut self, key: String, value: Vec<u8>, now: Instant) -> Result<()> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                self.stats.record_rejected_add();
                Err(CacheError::AlreadyExists(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(value, now));
                self.stats.set_total_entries(self.entries.len());
                Ok(())
            }
        }
    }

    // == Get ==
    /// Returns a copy of the stored bytes for `key`, if present.
    ///
    /// Reading never refreshes or removes the entry.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.data().to_vec())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Evict Stale ==
    /// Removes every entry whose age has reached `max_age`.
    ///
    /// Returns the number of entries removed and counts the call as one sweep.
    pub fn evict_stale(&mut self, max_age: Duration) -> usize {
        self.evict_stale_at(Instant::now(), max_age)
    }

    pub(crate) fn evict_stale_at(&mut self, now: Instant, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_stale_at(now, max_age));
        let removed = before - self.entries.len();

        self.stats.record_sweep(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
