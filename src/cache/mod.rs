//! Cache Module
//!
//! Provides the expiring byte cache: entries, the storage engine, statistics,
//! and the concurrent handle that owns a background reaper.

mod entry;
mod expiring;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiring::ExpiringCache;
pub use stats::CacheStats;
pub use store::CacheStore;
