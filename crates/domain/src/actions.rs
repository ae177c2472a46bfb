//! Weather actions - Strongly typed follow-up requests
//!
//! Each inline button the bot offers carries a `WeatherAction` encoded as
//! `"<action>:<location>"`. Decoding produces an explicit variant, so the
//! dispatcher matches on an enum instead of string prefixes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Separator between the action name and the location in callback data
const SEPARATOR: char = ':';

/// The kind of follow-up a user can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Current conditions card
    Current,
    /// 12-hour forecast
    Forecast12h,
    /// 7-day forecast
    Forecast7d,
    /// Air quality card
    AirQuality,
    /// Active alerts
    Alerts,
    /// Sun and moon times
    Astronomy,
    /// Re-fetch current conditions (back to the main card)
    Refresh,
}

impl ActionKind {
    /// Actions shown as buttons under the main weather card, in display order
    pub const KEYBOARD: [Self; 6] = [
        Self::Forecast12h,
        Self::Forecast7d,
        Self::AirQuality,
        Self::Alerts,
        Self::Astronomy,
        Self::Refresh,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Forecast12h => "forecast_12h",
            Self::Forecast7d => "forecast_7d",
            Self::AirQuality => "air_quality",
            Self::Alerts => "alerts",
            Self::Astronomy => "astronomy",
            Self::Refresh => "refresh",
        }
    }

    /// Text-catalog key for the button label
    #[must_use]
    pub const fn label_key(&self) -> &'static str {
        match self {
            Self::Current => "current_weather",
            Self::Forecast12h => "12h_forecast",
            Self::Forecast7d => "7d_forecast",
            Self::AirQuality => "air_quality",
            Self::Alerts => "weather_alerts",
            Self::Astronomy => "astronomy",
            Self::Refresh => "refresh",
        }
    }
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "forecast_12h" => Ok(Self::Forecast12h),
            "forecast_7d" => Ok(Self::Forecast7d),
            "air_quality" => Ok(Self::AirQuality),
            "alerts" => Ok(Self::Alerts),
            "astronomy" => Ok(Self::Astronomy),
            "refresh" => Ok(Self::Refresh),
            other => Err(DomainError::InvalidAction(format!("unknown action: {other}"))),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A follow-up request bound to a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAction {
    /// What to show
    pub kind: ActionKind,
    /// Location string the original request used
    pub location: String,
}

impl WeatherAction {
    /// Create an action
    pub fn new(kind: ActionKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }

    /// Encode as callback data
    #[must_use]
    pub fn to_callback_data(&self) -> String {
        format!("{}{SEPARATOR}{}", self.kind.as_str(), self.location)
    }

    /// Decode callback data
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAction` for an unknown action name or a
    /// missing location.
    pub fn parse_callback(data: &str) -> Result<Self, DomainError> {
        let (kind, location) = data
            .split_once(SEPARATOR)
            .ok_or_else(|| DomainError::InvalidAction(format!("malformed callback: {data}")))?;

        let location = location.trim();
        if location.is_empty() {
            return Err(DomainError::InvalidAction(format!(
                "callback without location: {data}"
            )));
        }

        Ok(Self::new(kind.parse()?, location))
    }
}
