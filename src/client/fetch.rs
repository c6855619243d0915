//! Cached Fetch Client
//!
//! Wraps a `reqwest` client with an [`ExpiringCache`] keyed by full URL.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::ExpiringCache;
use crate::client::{LocationArea, LocationAreaPage};
use crate::error::FetchError;

/// HTTP client that memoizes response bodies by URL.
#[derive(Debug, Clone)]
pub struct CachedClient {
    http: reqwest::Client,
    cache: Arc<ExpiringCache>,
}

impl CachedClient {
    /// Creates a client whose origin requests give up after `timeout`.
    pub fn new(cache: Arc<ExpiringCache>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { http, cache })
    }

    pub fn cache(&self) -> &Arc<ExpiringCache> {
        &self.cache
    }

    // == Fetch ==
    /// Returns the body for `url`, from the cache when present.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(cached) = self.cache.get(url).await {
            debug!("Cache hit for {}", url);
            return Ok(cached);
        }

        self.fetch_origin(url).await
    }

    // == Fetch JSON ==
    /// Fetches `url` and decodes it as JSON.
    ///
    /// A cached body that does not decode is ignored and the resource is
    /// fetched again from the origin.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        if let Some(cached) = self.cache.get(url).await {
            match serde_json::from_slice(&cached) {
                Ok(decoded) => return Ok(decoded),
                Err(err) => warn!("Cached body for {} failed to decode: {}", url, err),
            }
        }

        let body = self.fetch_origin(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches one page of the location-area listing.
    pub async fn location_area_page(&self, url: &str) -> Result<LocationAreaPage, FetchError> {
        self.fetch_json(url).await
    }

    /// Fetches the details of one location area.
    pub async fn location_area(&self, url: &str) -> Result<LocationArea, FetchError> {
        self.fetch_json(url).await
    }

    async fn fetch_origin(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Fetching {} from origin", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?.to_vec();

        if let Err(err) = self.cache.add(url, body.clone()).await {
            // Another caller populated the key while we were fetching.
            debug!("Not caching {}: {}", url, err);
        }

        Ok(body)
    }
}
