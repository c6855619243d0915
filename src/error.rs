//! Error types for the expiring cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors produced by the cache itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is already populated; the existing value was kept
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Eviction interval must be non-zero
    #[error("Eviction interval must be greater than zero")]
    InvalidInterval,

    /// No tokio runtime to host the background reaper
    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

impl CacheError {
    /// Returns true for the non-fatal "someone else populated this key" signal.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, CacheError::AlreadyExists(_))
    }
}

// == Fetch Error Enum ==
/// Errors produced while fetching a resource through the cache.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("Client setup failed: {0}")]
    Client(String),

    /// Transport-level failure talking to the origin
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Origin answered with a non-success status
    #[error("Origin returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Body could not be decoded into the requested type
    #[error("Decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
