//! Weather cache port definition
//!
//! Keyed, time-bounded storage of normalized weather payloads. One live
//! entry exists per `(location key, data type)`; writing replaces it.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{LocationQuery, WeatherDataType};
#[cfg(test)]
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::ApplicationError;

/// Cache key: the lower-cased raw location plus a data-type tag
///
/// Dated categories (history) carry the date in the tag so that different
/// days of the same location do not overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    location: String,
    data_type: String,
}

impl CacheKey {
    /// Key for an undated category
    pub fn new(location: &LocationQuery, data_type: WeatherDataType) -> Self {
        Self {
            location: location.cache_key(),
            data_type: data_type.as_str().to_string(),
        }
    }

    /// Key for a category that depends on a date
    pub fn dated(location: &LocationQuery, data_type: WeatherDataType, date: NaiveDate) -> Self {
        Self {
            location: location.cache_key(),
            data_type: format!("{}:{}", data_type.as_str(), date.format("%Y-%m-%d")),
        }
    }

    /// Key for a free-text search
    pub fn search(text: &str) -> Self {
        Self {
            location: text.trim().to_lowercase(),
            data_type: WeatherDataType::Search.as_str().to_string(),
        }
    }

    /// Location part
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Data-type part
    pub fn data_type(&self) -> &str {
        &self.data_type
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.location, self.data_type)
    }
}

/// Rows removed by a maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Expired cache entries deleted
    pub cache_entries: u64,
    /// Request-log rows past the retention window deleted
    pub request_logs: u64,
}

/// Cache port for serialized weather payloads
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherCachePort: Send + Sync {
    /// The payload for `key` if it has not expired yet
    async fn get_fresh(&self, key: &CacheKey) -> Result<Option<String>, ApplicationError>;

    /// Insert or replace the payload for `key`, expiring `ttl` from now
    async fn put(&self, key: &CacheKey, payload: &str, ttl: Duration)
    -> Result<(), ApplicationError>;

    /// Delete entries that expired before `cutoff` and request-log rows older
    /// than the store's retention window, in one transaction
    async fn evict_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<EvictionReport, ApplicationError>;
}

/// Typed cache operations on top of the string payload interface
#[async_trait]
pub trait WeatherCachePortExt: WeatherCachePort {
    /// Get and deserialize a fresh payload
    ///
    /// A payload that no longer deserializes counts as a miss.
    async fn get_payload<T>(&self, key: &CacheKey) -> Result<Option<T>, ApplicationError>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get_fresh(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            },
        }
    }

    /// Serialize and store a payload
    async fn put_payload<T>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<(), ApplicationError>
    where
        T: Serialize + Send + Sync,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| ApplicationError::Internal(format!("Cache serialization error: {e}")))?;
        self.put(key, &raw, ttl).await
    }
}

impl<T: WeatherCachePort + ?Sized> WeatherCachePortExt for T {}
