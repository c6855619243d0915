//! Configuration Module
//!
//! Handles loading runtime configuration from environment variables.

use std::env;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Eviction interval in seconds (sweep period and staleness threshold)
    pub eviction_interval: u64,
    /// Origin request timeout in seconds
    pub fetch_timeout: u64,
    /// Base URL that relative fetch paths are joined to
    pub base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_EVICTION_INTERVAL` - Eviction interval in seconds (default: 300)
    /// - `FETCH_TIMEOUT` - Origin request timeout in seconds (default: 5)
    /// - `ORIGIN_BASE_URL` - Base URL for relative paths (default: https://pokeapi.co/api/v2)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            eviction_interval: env::var("CACHE_EVICTION_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.eviction_interval),
            fetch_timeout: env::var("FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout),
            base_url: env::var("ORIGIN_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
        }
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eviction_interval: 300,
            fetch_timeout: 5,
            base_url: "https://pokeapi.co/api/v2".to_string(),
        }
    }
}
