//! Port for request log persistence
//!
//! Append-only record of every orchestrated weather request, plus the
//! aggregate queries built on top of it.

use async_trait::async_trait;
use domain::{RequestLogRecord, UserId};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A location and how often it was requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    /// Location string as supplied by users
    pub location: String,
    /// Number of requests
    pub count: u64,
}

/// Per-user request statistics over a window of days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Requests in the window
    pub total_requests: u64,
    /// Requests that produced data
    pub successful_requests: u64,
    /// Mean response time in milliseconds
    pub avg_response_ms: f64,
    /// Up to 5 most requested locations, most frequent first
    pub top_locations: Vec<LocationCount>,
}

impl UserStats {
    /// Fraction of successful requests (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64
        }
    }
}

/// A language and how many users chose it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    /// Language code
    pub language: String,
    /// Number of users
    pub users: u64,
}

/// Service-wide usage overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Distinct users known to the service
    pub total_users: u64,
    /// Requests since midnight UTC
    pub requests_today: u64,
    /// Up to 10 most requested locations over the last 7 days
    pub top_locations: Vec<LocationCount>,
    /// Users per preferred language, largest first
    pub languages: Vec<LanguageCount>,
}

/// Port for request log storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RequestLogPort: Send + Sync {
    /// Append a record
    async fn record(&self, record: &RequestLogRecord) -> Result<(), ApplicationError>;

    /// Statistics for one user over the last `days` days
    async fn user_stats(&self, user: &UserId, days: u32) -> Result<UserStats, ApplicationError>;

    /// Service-wide overview
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApplicationError>;
}
