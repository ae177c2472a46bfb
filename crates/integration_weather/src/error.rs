//! Weather client error types

use thiserror::Error;

/// Errors that can occur while talking to the weather provider
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured timeout in seconds
        timeout_secs: u64,
    },

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API key is missing, invalid or disabled
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider could not resolve the location
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
