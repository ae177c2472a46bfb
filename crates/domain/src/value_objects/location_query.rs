//! Location query value object
//!
//! Classifies raw user input as either a coordinate pair (`"40.7,-74.0"`)
//! or a free-text place name (`"Paris, France"`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geo_location::{GeoLocation, validate_coordinates};
use crate::errors::DomainError;

/// How a location string was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// A validated latitude/longitude pair
    Coordinates,
    /// Free-text place name
    PlaceName,
}

/// A parsed, immutable location query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationQuery {
    kind: LocationKind,
    raw: String,
    coordinates: Option<GeoLocation>,
    city: String,
    region: String,
    country: String,
}

impl LocationQuery {
    /// Parse raw input into a query
    ///
    /// Never fails: input that is not a valid coordinate pair becomes a place
    /// name, with the whole trimmed string as the city when it has no commas.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(location) = parse_coordinates(raw) {
            return Self {
                kind: LocationKind::Coordinates,
                raw: raw.to_string(),
                coordinates: Some(location),
                city: String::new(),
                region: String::new(),
                country: String::new(),
            };
        }

        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let city = parts.first().copied().unwrap_or_default().to_string();
        let country = if parts.len() > 1 {
            parts.last().copied().unwrap_or_default().to_string()
        } else {
            String::new()
        };
        let region = if parts.len() >= 3 {
            parts[1].to_string()
        } else {
            String::new()
        };

        Self {
            kind: LocationKind::PlaceName,
            raw: raw.to_string(),
            coordinates: None,
            city,
            region,
            country,
        }
    }

    /// Parse raw input, rejecting empty input
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` when the trimmed input is empty.
    pub fn try_parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::InvalidLocation(
                "location must not be empty".to_string(),
            ));
        }
        Ok(Self::parse(raw))
    }

    /// Build a query from a GPS fix
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if the pair is out of range.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let location = GeoLocation::new(latitude, longitude)?;
        Ok(Self {
            kind: LocationKind::Coordinates,
            raw: location.to_query(),
            coordinates: Some(location),
            city: String::new(),
            region: String::new(),
            country: String::new(),
        })
    }

    /// How the input was classified
    #[must_use]
    pub const fn kind(&self) -> LocationKind {
        self.kind
    }

    /// Whether the input was a coordinate pair
    #[must_use]
    pub const fn is_coordinates(&self) -> bool {
        matches!(self.kind, LocationKind::Coordinates)
    }

    /// The trimmed input
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Coordinates, when the input was a coordinate pair
    #[must_use]
    pub const fn coordinates(&self) -> Option<GeoLocation> {
        self.coordinates
    }

    /// Latitude, when the input was a coordinate pair
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude())
    }

    /// Longitude, when the input was a coordinate pair
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude())
    }

    /// City (first comma-separated token)
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Region (middle token of three or more), empty otherwise
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Country (last token of two or more), empty otherwise
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Value for the provider's `q` parameter
    #[must_use]
    pub fn provider_query(&self) -> String {
        self.coordinates
            .map_or_else(|| self.raw.clone(), |c| c.to_query())
    }

    /// Cache key component: the trimmed input, lower-cased
    ///
    /// Different spellings of the same place produce different keys.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.raw.to_lowercase()
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Match `lat,lon` where each side is `[+-]?digits[.digits*]`
fn parse_coordinates(input: &str) -> Option<GeoLocation> {
    let (lat, lon) = input.split_once(',')?;
    let latitude = parse_coordinate_component(lat)?;
    let longitude = parse_coordinate_component(lon.trim_start())?;

    if !validate_coordinates(latitude, longitude) {
        return None;
    }
    GeoLocation::new(latitude, longitude).ok()
}

fn parse_coordinate_component(s: &str) -> Option<f64> {
    let unsigned = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if int_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    s.trim_end_matches('.').parse().ok()
}
