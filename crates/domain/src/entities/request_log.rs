//! Request log entity - One row per orchestrated weather request

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{UserId, WeatherDataType};

/// Outcome of a single weather request, written once and never updated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogRecord {
    /// Auto-incrementing ID (set by database)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Correlation id for tracing
    pub request_id: Uuid,
    /// Who asked
    pub user_id: UserId,
    /// Location string as supplied
    pub location: String,
    /// Requested data category
    pub request_type: WeatherDataType,
    /// Wall-clock time from dispatch to completion
    pub response_time_ms: u64,
    /// Whether the request produced data
    pub success: bool,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl RequestLogRecord {
    /// Create a record for a successful request
    pub fn success(
        user_id: UserId,
        location: impl Into<String>,
        request_type: WeatherDataType,
        elapsed: Duration,
    ) -> Self {
        Self {
            id: None,
            request_id: Uuid::now_v7(),
            user_id,
            location: location.into(),
            request_type,
            response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            success: true,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Create a record for a failed request
    pub fn failure(
        user_id: UserId,
        location: impl Into<String>,
        request_type: WeatherDataType,
        elapsed: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error_message: Some(error.into()),
            ..Self::success(user_id, location, request_type, elapsed)
        }
    }

    /// Set the correlation id
    #[must_use]
    pub const fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}
