//! Port for user preference storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{GeoLocation, UnitPreferences, UserId};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A saved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    /// Display / query name
    pub name: String,
    /// Optional GPS fix
    pub coordinates: Option<GeoLocation>,
    /// Whether this is the user's default location
    pub is_default: bool,
    /// When it was saved
    pub created_at: DateTime<Utc>,
}

impl FavoriteLocation {
    /// A new favorite saved now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// Attach coordinates
    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: GeoLocation) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Mark as default
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Port for per-user settings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PreferencePort: Send + Sync {
    /// Preferred language code, if the user chose one
    async fn language(&self, user: &UserId) -> Result<Option<String>, ApplicationError>;

    /// Preferred measurement units, if the user has a preferences row
    async fn units(&self, user: &UserId) -> Result<Option<UnitPreferences>, ApplicationError>;

    /// Store the preferred language
    async fn set_language(&self, user: &UserId, language: &str) -> Result<(), ApplicationError>;

    /// Store the preferred units
    async fn set_units(
        &self,
        user: &UserId,
        units: UnitPreferences,
    ) -> Result<(), ApplicationError>;

    /// Save a favorite; a new default replaces the previous default
    async fn add_favorite(
        &self,
        user: &UserId,
        favorite: &FavoriteLocation,
    ) -> Result<(), ApplicationError>;

    /// Saved favorites, default first, then newest first
    async fn favorites(&self, user: &UserId) -> Result<Vec<FavoriteLocation>, ApplicationError>;
}
