//! Expiring Cache - a process-local, time-expiring byte cache
//!
//! Memoizes fetched responses by request identity for a bounded freshness
//! window, with a background reaper that sweeps stale entries.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod repl;
pub mod tasks;

pub use cache::{CacheStats, ExpiringCache};
pub use client::CachedClient;
pub use config::Config;
pub use error::{CacheError, FetchError};
