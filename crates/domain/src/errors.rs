//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Location input is empty or otherwise unusable
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Callback data could not be decoded into an action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Unknown measurement unit name
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

impl DomainError {
    /// Whether the user can fix this by sending different input
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidLocation(_)
                | Self::InvalidCoordinates { .. }
                | Self::ValidationError(_)
                | Self::InvalidDateTime(_)
        )
    }
}
