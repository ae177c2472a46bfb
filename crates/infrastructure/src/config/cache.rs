//! Weather cache and request-log retention settings.

use std::time::Duration;

use application::WeatherServiceConfig;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// TTL for current, forecast, air quality, astronomy and search payloads
    /// in seconds (default: 10 minutes)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// TTL for history payloads in seconds (default: 24 hours)
    #[serde(default = "default_history_ttl_secs")]
    pub history_ttl_secs: u64,

    /// Days of request log kept by the maintenance task (default: 30)
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,

    /// Cron expression for the maintenance task (default: every 30 minutes)
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

const fn default_ttl_secs() -> u64 {
    10 * 60
}

const fn default_history_ttl_secs() -> u64 {
    24 * 60 * 60
}

const fn default_log_retention_days() -> u32 {
    crate::persistence::DEFAULT_LOG_RETENTION_DAYS
}

fn default_cleanup_cron() -> String {
    crate::scheduler::DEFAULT_CLEANUP_CRON.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
            history_ttl_secs: default_history_ttl_secs(),
            log_retention_days: default_log_retention_days(),
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

impl CacheConfig {
    /// Regular TTL as a Duration
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// History TTL as a Duration
    #[must_use]
    pub const fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }

    /// Orchestrator settings derived from this section
    #[must_use]
    pub const fn service_config(&self) -> WeatherServiceConfig {
        WeatherServiceConfig {
            cache_enabled: self.enabled,
            ttl: self.ttl(),
            history_ttl: self.history_ttl(),
        }
    }
}
