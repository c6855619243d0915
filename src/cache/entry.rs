//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored byte value plus the instant it was inserted.
///
/// The data is never mutated after construction.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Vec<u8>,
    created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry inserted at `created_at`.
    pub(crate) fn new(data: Vec<u8>, created_at: Instant) -> Self {
        Self { data, created_at }
    }

    /// Borrow the stored bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    // == Age ==
    /// Time elapsed between insertion and `now`. Saturates at zero.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `max_age` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is stale, the
    /// same convention as a TTL that has fully elapsed.
    pub fn is_stale_at(&self, now: Instant, max_age: Duration) -> bool {
        self.age_at(now) >= max_age
    }
}
