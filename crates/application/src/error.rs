//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (user input that failed validation)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Weather provider unreachable or returned an unusable response
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Provider rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The provider could not resolve the location
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (storage, serialization, task join)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }

    /// Whether the user can fix this by sending different input
    pub const fn is_user_correctable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_user_correctable(),
            Self::NotFound(_) => true,
            _ => false,
        }
    }
}
