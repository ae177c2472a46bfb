//! Weather service port
//!
//! Defines the interface for weather data retrieval. Implementations return
//! already-normalized canonical payloads.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, LocationQuery, WeatherAlert,
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Current conditions, including today's sunrise and sunset
    async fn fetch_current(
        &self,
        location: &LocationQuery,
    ) -> Result<CurrentConditions, ApplicationError>;

    /// The next 12 hours starting at the location's current hour
    async fn fetch_hourly_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<HourlyForecastEntry>, ApplicationError>;

    /// Up to 7 days of forecast
    async fn fetch_daily_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<DailyForecastEntry>, ApplicationError>;

    /// Air quality with composite AQI estimate
    async fn fetch_air_quality(
        &self,
        location: &LocationQuery,
    ) -> Result<AirQuality, ApplicationError>;

    /// Active weather alerts
    async fn fetch_alerts(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<WeatherAlert>, ApplicationError>;

    /// Sun and moon data for a date
    async fn fetch_astronomy(
        &self,
        location: &LocationQuery,
        date: NaiveDate,
    ) -> Result<AstronomyData, ApplicationError>;

    /// Locations matching free text
    async fn search_locations(&self, text: &str) -> Result<Vec<LocationMatch>, ApplicationError>;

    /// Observed weather for a past date
    async fn fetch_historical(
        &self,
        location: &LocationQuery,
        date: NaiveDate,
    ) -> Result<HistoricalDay, ApplicationError>;
}
