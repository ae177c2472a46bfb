//! WeatherAPI.com client
//!
//! HTTP client for the WeatherAPI.com REST API.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Timelike};
use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, WeatherAlert,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{api, error::WeatherError, normalize};

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// WeatherAPI.com key (required)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (default: <http://api.weatherapi.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of location search hits (default: 5)
    #[serde(default = "default_max_location_results")]
    pub max_location_results: usize,
}

fn default_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_max_location_results() -> usize {
    5
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_location_results: default_max_location_results(),
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_location_results", &self.max_location_results)
            .finish()
    }
}

/// Weather client trait for fetching normalized weather data
///
/// `query` is whatever the provider accepts as `q`: a place name or a
/// `"lat,lon"` pair.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions including today's sunrise and sunset
    async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, WeatherError>;

    /// The next 12 hours starting at the location's current hour
    async fn fetch_hourly_forecast(
        &self,
        query: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError>;

    /// Up to seven days of forecast
    async fn fetch_daily_forecast(
        &self,
        query: &str,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError>;

    /// Pollutant concentrations and the composite AQI estimate
    async fn fetch_air_quality(&self, query: &str) -> Result<AirQuality, WeatherError>;

    /// Active weather alerts, empty when none
    async fn fetch_alerts(&self, query: &str) -> Result<Vec<WeatherAlert>, WeatherError>;

    /// Sun and moon times for a date
    async fn fetch_astronomy(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<AstronomyData, WeatherError>;

    /// Locations matching free text
    async fn search_locations(&self, text: &str) -> Result<Vec<LocationMatch>, WeatherError>;

    /// Observed weather for a past date
    async fn fetch_historical(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<HistoricalDay, WeatherError>;
}

/// WeatherAPI.com HTTP client implementation
///
/// Owns one `reqwest::Client` for its whole lifetime; share the client
/// itself (e.g. behind an `Arc`) rather than building one per request.
pub struct WeatherApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    max_location_results: usize,
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_location_results", &self.max_location_results)
            .finish_non_exhaustive()
    }
}

impl WeatherApiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the API key is missing and
    /// `ConnectionFailed` if the HTTP client cannot be initialized.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                WeatherError::ConfigurationError("WeatherAPI key is required".to_string())
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            max_location_results: config.max_location_results,
        })
    }

    /// Issue a GET against `endpoint` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint, "Sending WeatherAPI request");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else if e.is_connect() {
                    WeatherError::ConnectionFailed(e.to_string())
                } else {
                    WeatherError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(endpoint, status = %status, "Received WeatherAPI response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))
    }

    /// Map a non-success 4xx status and its body to an error
    fn status_error(status: StatusCode, body: &str) -> WeatherError {
        let detail = serde_json::from_str::<api::ErrorBody>(body)
            .ok()
            .filter(|b| !b.error.message.is_empty());

        match (status, detail) {
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, detail) => {
                WeatherError::AuthenticationFailed(
                    detail.map_or_else(|| format!("HTTP {status}"), |d| d.error.message),
                )
            },
            (StatusCode::BAD_REQUEST, Some(d)) if d.error.code == api::NO_MATCHING_LOCATION => {
                WeatherError::NotFound(d.error.message)
            },
            (_, Some(d)) => {
                WeatherError::RequestFailed(format!("HTTP {status}: {}", d.error.message))
            },
            (_, None) => WeatherError::RequestFailed(format!("HTTP {status}")),
        }
    }

    fn q(query: &str) -> (&'static str, String) {
        ("q", query.trim().to_string())
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, WeatherError> {
        let resp: api::ForecastResponse = self
            .get_json(
                "forecast.json",
                &[
                    Self::q(query),
                    ("days", "1".into()),
                    ("aqi", "no".into()),
                    ("alerts", "no".into()),
                ],
            )
            .await?;
        Ok(normalize::current_conditions(&resp))
    }

    #[instrument(skip(self))]
    async fn fetch_hourly_forecast(
        &self,
        query: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
        let resp: api::ForecastResponse = self
            .get_json(
                "forecast.json",
                &[
                    Self::q(query),
                    ("days", "2".into()),
                    ("hours", "24".into()),
                    ("aqi", "no".into()),
                    ("alerts", "no".into()),
                ],
            )
            .await?;

        let current_hour = normalize::local_hour(&resp.location.localtime).unwrap_or_else(|| {
            let hour = Local::now().hour();
            warn!(
                localtime = %resp.location.localtime,
                fallback_hour = hour,
                "Provider local time unusable, using host clock"
            );
            u8::try_from(hour).unwrap_or(0)
        });

        let entries = normalize::hourly_window(&resp.forecast.forecastday, current_hour);
        debug!(current_hour, entries = entries.len(), "Built hourly window");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn fetch_daily_forecast(
        &self,
        query: &str,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        let resp: api::ForecastResponse = self
            .get_json(
                "forecast.json",
                &[
                    Self::q(query),
                    ("days", normalize::DAILY_WINDOW.to_string()),
                    ("aqi", "no".into()),
                    ("alerts", "no".into()),
                ],
            )
            .await?;
        Ok(normalize::daily_entries(&resp.forecast.forecastday))
    }

    #[instrument(skip(self))]
    async fn fetch_air_quality(&self, query: &str) -> Result<AirQuality, WeatherError> {
        let resp: api::CurrentResponse = self
            .get_json("current.json", &[Self::q(query), ("aqi", "yes".into())])
            .await?;
        Ok(normalize::air_quality(&resp))
    }

    #[instrument(skip(self))]
    async fn fetch_alerts(&self, query: &str) -> Result<Vec<WeatherAlert>, WeatherError> {
        let resp: api::ForecastResponse = self
            .get_json(
                "forecast.json",
                &[
                    Self::q(query),
                    ("days", "1".into()),
                    ("aqi", "no".into()),
                    ("alerts", "yes".into()),
                ],
            )
            .await?;
        Ok(normalize::alerts(&resp))
    }

    #[instrument(skip(self), fields(date = %date))]
    async fn fetch_astronomy(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<AstronomyData, WeatherError> {
        let resp: api::AstronomyResponse = self
            .get_json(
                "astronomy.json",
                &[Self::q(query), ("dt", date.format("%Y-%m-%d").to_string())],
            )
            .await?;
        Ok(normalize::astronomy(&resp))
    }

    #[instrument(skip(self))]
    async fn search_locations(&self, text: &str) -> Result<Vec<LocationMatch>, WeatherError> {
        let hits: Vec<api::SearchHit> = self.get_json("search.json", &[Self::q(text)]).await?;
        let matches = normalize::location_matches(hits, self.max_location_results);
        debug!(results = matches.len(), "Location search completed");
        Ok(matches)
    }

    #[instrument(skip(self), fields(date = %date))]
    async fn fetch_historical(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<HistoricalDay, WeatherError> {
        let resp: api::ForecastResponse = self
            .get_json(
                "history.json",
                &[Self::q(query), ("dt", date.format("%Y-%m-%d").to_string())],
            )
            .await?;
        normalize::historical_day(&resp, date)
    }
}
