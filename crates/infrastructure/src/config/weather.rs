//! Weather provider configuration.

use std::fmt;

use integration_weather::WeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// WeatherAPI.com settings
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// API key (sensitive; set via `WEATHERBOT_WEATHER__API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of location search results
    #[serde(default = "default_max_location_results")]
    pub max_location_results: usize,
}

impl fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_location_results", &self.max_location_results)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_location_results() -> usize {
    5
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_location_results: default_max_location_results(),
        }
    }
}

impl WeatherAppConfig {
    /// Client configuration with the key exposed
    #[must_use]
    pub fn client_config(&self) -> WeatherConfig {
        WeatherConfig {
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            max_location_results: self.max_location_results,
        }
    }
}
