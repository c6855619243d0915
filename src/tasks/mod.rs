//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of a cache.
//!
//! # Tasks
//! - Reaper: sweeps stale cache entries once per eviction interval

mod reaper;

pub use reaper::{spawn_reaper_task, ReaperHandle};
