//! Canonical weather payloads
//!
//! Provider-agnostic records produced by the weather client and stored in the
//! cache. Every field is total: a value the provider omitted is zero or empty,
//! never absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// `"name, country"` label from the provider
    pub location: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Feels-like temperature in Celsius
    pub feels_like_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Wind direction in degrees (0-360)
    pub wind_degree: u16,
    /// Condition text, e.g. "Partly cloudy"
    pub condition: String,
    /// Pressure in millibars
    pub pressure_mb: f64,
    /// Visibility in kilometres
    pub visibility_km: f64,
    /// UV index
    pub uv_index: f64,
    /// Sunrise, provider local time string (e.g. "06:12 AM")
    pub sunrise: String,
    /// Sunset, provider local time string
    pub sunset: String,
    /// Provider's last-updated timestamp string
    pub last_updated: String,
}

/// One hour of the short-range forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Display label, e.g. "02 PM"
    pub time: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Condition text
    pub condition: String,
    /// Chance of rain percentage (0-100)
    pub chance_of_rain: u8,
    /// Wind speed in km/h
    pub wind_kph: f64,
}

/// One day of the medium-range forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// Forecast date, when the provider's date parsed
    pub date: Option<NaiveDate>,
    /// Display label, e.g. "Mon, Jan 15"
    pub label: String,
    /// Minimum temperature in Celsius
    pub min_temp_c: f64,
    /// Maximum temperature in Celsius
    pub max_temp_c: f64,
    /// Condition text
    pub condition: String,
    /// Chance of rain percentage (0-100)
    pub chance_of_rain: u8,
    /// Average humidity percentage (0-100)
    pub avg_humidity: u8,
}

/// Approximate air quality band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    /// 0-50
    #[default]
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    UnhealthyForSensitiveGroups,
    /// Above 150
    Unhealthy,
}

impl AqiBand {
    /// Band for a composite AQI value
    #[must_use]
    pub const fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            _ => Self::Unhealthy,
        }
    }

    /// English status label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
        }
    }
}

impl std::fmt::Display for AqiBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pollutant concentrations in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pollutants {
    /// Carbon monoxide
    pub co: f64,
    /// Nitrogen dioxide
    pub no2: f64,
    /// Ozone
    pub o3: f64,
    /// Fine particulate matter
    pub pm2_5: f64,
    /// Coarse particulate matter
    pub pm10: f64,
}

impl Pollutants {
    /// Composite AQI estimate: `max(PM2.5 × 2, PM10, NO₂ / 2, O₃ / 2, CO / 10)`
    ///
    /// An approximation, not a regulatory index. The constants are fixed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn composite_aqi(&self) -> u32 {
        let value = [
            self.pm2_5 * 2.0,
            self.pm10,
            self.no2 / 2.0,
            self.o3 / 2.0,
            self.co / 10.0,
        ]
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

        // `as` saturates: negatives become 0, huge values u32::MAX
        value as u32
    }

    /// Concentrations rounded to two decimals
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            co: round2(self.co),
            no2: round2(self.no2),
            o3: round2(self.o3),
            pm2_5: round2(self.pm2_5),
            pm10: round2(self.pm10),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Air quality summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirQuality {
    /// Composite AQI estimate
    pub aqi: u32,
    /// Band for `aqi`
    pub band: AqiBand,
    /// Concentrations, rounded to two decimals
    pub pollutants: Pollutants,
}

impl AirQuality {
    /// Derive the composite index and band from raw concentrations
    #[must_use]
    pub fn from_pollutants(pollutants: Pollutants) -> Self {
        let aqi = pollutants.composite_aqi();
        Self {
            aqi,
            band: AqiBand::from_aqi(aqi),
            pollutants: pollutants.rounded(),
        }
    }
}

/// An active weather alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Headline
    pub title: String,
    /// Full description
    pub description: String,
    /// Provider severity (e.g. "Moderate", "Severe")
    pub severity: String,
    /// Start of the effective window
    pub effective: String,
    /// End of the effective window
    pub expires: String,
    /// Affected areas
    pub areas: String,
}

/// Sun and moon times for a day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AstronomyData {
    /// Sunrise time
    pub sunrise: String,
    /// Sunset time
    pub sunset: String,
    /// Moonrise time
    pub moonrise: String,
    /// Moonset time
    pub moonset: String,
    /// Moon phase name, e.g. "Waxing Gibbous"
    pub moon_phase: String,
    /// Illuminated fraction percentage
    pub moon_illumination: f64,
}

/// A location search hit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationMatch {
    /// Place name
    pub name: String,
    /// Region / state
    pub region: String,
    /// Country
    pub country: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl LocationMatch {
    /// `"name, region, country"` with empty parts omitted
    #[must_use]
    pub fn display_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Observed weather for a past day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalDay {
    /// The requested date
    pub date: Option<NaiveDate>,
    /// Maximum temperature in Celsius
    pub max_temp_c: f64,
    /// Minimum temperature in Celsius
    pub min_temp_c: f64,
    /// Average temperature in Celsius
    pub avg_temp_c: f64,
    /// Condition text
    pub condition: String,
    /// Total precipitation in mm
    pub total_precip_mm: f64,
    /// Average humidity percentage (0-100)
    pub avg_humidity: u8,
    /// Maximum wind in km/h
    pub max_wind_kph: f64,
}
