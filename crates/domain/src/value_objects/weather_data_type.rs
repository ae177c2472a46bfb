//! Weather data categories
//!
//! Used as the second half of a cache key and as the request type in the
//! request log.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A category of weather data the bot can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherDataType {
    /// Current conditions
    Current,
    /// Next 12 hours
    #[serde(rename = "forecast12h")]
    Forecast12h,
    /// Next 7 days
    #[serde(rename = "forecast7d")]
    Forecast7d,
    /// Air quality
    AirQuality,
    /// Active weather alerts
    Alerts,
    /// Sun and moon times
    Astronomy,
    /// Location search results
    Search,
    /// A past day
    History,
}

impl WeatherDataType {
    /// All categories
    pub const ALL: [Self; 8] = [
        Self::Current,
        Self::Forecast12h,
        Self::Forecast7d,
        Self::AirQuality,
        Self::Alerts,
        Self::Astronomy,
        Self::Search,
        Self::History,
    ];

    /// Stable name used in cache keys and the request log
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Forecast12h => "forecast12h",
            Self::Forecast7d => "forecast7d",
            Self::AirQuality => "airquality",
            Self::Alerts => "alerts",
            Self::Astronomy => "astronomy",
            Self::Search => "search",
            Self::History => "history",
        }
    }

    /// Alerts are time-critical and always fetched fresh
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        !matches!(self, Self::Alerts)
    }
}

impl fmt::Display for WeatherDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherDataType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown data type: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(WeatherDataType::Current.as_str(), "current");
        assert_eq!(WeatherDataType::Forecast12h.as_str(), "forecast12h");
        assert_eq!(WeatherDataType::Forecast7d.as_str(), "forecast7d");
        assert_eq!(WeatherDataType::AirQuality.as_str(), "airquality");
        assert_eq!(WeatherDataType::Alerts.as_str(), "alerts");
    }

    #[test]
    fn only_alerts_bypass_cache() {
        for t in WeatherDataType::ALL {
            assert_eq!(t.is_cacheable(), t != WeatherDataType::Alerts);
        }
    }

    #[test]
    fn parses_every_name() {
        for t in WeatherDataType::ALL {
            assert_eq!(t.as_str().parse::<WeatherDataType>().unwrap(), t);
        }
        assert!("hourly".parse::<WeatherDataType>().is_err());
    }

    #[test]
    fn serde_matches_names() {
        for t in WeatherDataType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }
}
