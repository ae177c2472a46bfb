//! Measurement unit preferences

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Temperature display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Degrees Celsius
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

/// Wind speed display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    /// Kilometres per hour
    #[default]
    Kmh,
    /// Miles per hour
    Mph,
}

impl TemperatureUnit {
    /// Storage/config name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }
}

impl WindUnit {
    /// Storage/config name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kmh => "kmh",
            Self::Mph => "mph",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WindUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" => Ok(Self::Celsius),
            "fahrenheit" | "f" => Ok(Self::Fahrenheit),
            other => Err(DomainError::UnknownUnit(other.to_string())),
        }
    }
}

impl FromStr for WindUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kmh" | "km/h" | "kph" => Ok(Self::Kmh),
            "mph" => Ok(Self::Mph),
            other => Err(DomainError::UnknownUnit(other.to_string())),
        }
    }
}

/// A user's display units
///
/// Pressure, visibility and precipitation follow the wind unit's system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPreferences {
    /// Temperature unit
    pub temperature: TemperatureUnit,
    /// Wind speed unit
    pub wind: WindUnit,
}

impl UnitPreferences {
    /// Metric units (°C, km/h)
    #[must_use]
    pub const fn metric() -> Self {
        Self {
            temperature: TemperatureUnit::Celsius,
            wind: WindUnit::Kmh,
        }
    }

    /// Imperial units (°F, mph)
    #[must_use]
    pub const fn imperial() -> Self {
        Self {
            temperature: TemperatureUnit::Fahrenheit,
            wind: WindUnit::Mph,
        }
    }

    /// Whether distances, pressure and precipitation use imperial units
    #[must_use]
    pub const fn imperial_distances(&self) -> bool {
        matches!(self.wind, WindUnit::Mph)
    }
}
