//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::{error::ApplicationError, ports::WeatherPort};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, LocationQuery, WeatherAlert,
};
use integration_weather::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, instrument};

/// Adapter for the WeatherAPI.com client
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter").finish_non_exhaustive()
    }
}

impl WeatherAdapter {
    /// Create an adapter with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the API key is missing or
    /// the HTTP client fails to initialize.
    pub fn new(config: &WeatherConfig) -> Result<Self, ApplicationError> {
        let client = WeatherApiClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(_)
            | WeatherError::Timeout { .. }
            | WeatherError::RequestFailed(_)
            | WeatherError::ServiceUnavailable(_)
            | WeatherError::ParseError(_) => ApplicationError::ExternalService(err.to_string()),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::NotFound(msg) => ApplicationError::NotFound(msg),
            WeatherError::AuthenticationFailed(_) | WeatherError::ConfigurationError(_) => {
                ApplicationError::Configuration(err.to_string())
            },
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_current(
        &self,
        location: &LocationQuery,
    ) -> Result<CurrentConditions, ApplicationError> {
        let current = self
            .client
            .fetch_current(&location.provider_query())
            .await
            .map_err(Self::map_error)?;
        debug!(temperature = current.temperature_c, "Fetched current conditions");
        Ok(current)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_hourly_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<HourlyForecastEntry>, ApplicationError> {
        let hours = self
            .client
            .fetch_hourly_forecast(&location.provider_query())
            .await
            .map_err(Self::map_error)?;
        debug!(entries = hours.len(), "Fetched hourly forecast");
        Ok(hours)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_daily_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<DailyForecastEntry>, ApplicationError> {
        let days = self
            .client
            .fetch_daily_forecast(&location.provider_query())
            .await
            .map_err(Self::map_error)?;
        debug!(entries = days.len(), "Fetched daily forecast");
        Ok(days)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_air_quality(
        &self,
        location: &LocationQuery,
    ) -> Result<AirQuality, ApplicationError> {
        self.client
            .fetch_air_quality(&location.provider_query())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn fetch_alerts(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<WeatherAlert>, ApplicationError> {
        self.client
            .fetch_alerts(&location.provider_query())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(location = %location, date = %date))]
    async fn fetch_astronomy(
        &self,
        location: &LocationQuery,
        date: NaiveDate,
    ) -> Result<AstronomyData, ApplicationError> {
        self.client
            .fetch_astronomy(&location.provider_query(), date)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    async fn search_locations(&self, text: &str) -> Result<Vec<LocationMatch>, ApplicationError> {
        self.client
            .search_locations(text.trim())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(location = %location, date = %date))]
    async fn fetch_historical(
        &self,
        location: &LocationQuery,
        date: NaiveDate,
    ) -> Result<HistoricalDay, ApplicationError> {
        self.client
            .fetch_historical(&location.provider_query(), date)
            .await
            .map_err(Self::map_error)
    }
}
