//! Application configuration
//!
//! Split into focused sub-modules:
//! - `weather`: provider key, base URL, timeout
//! - `database`: SQLite database settings
//! - `cache`: cache TTLs, log retention, maintenance schedule
//! - `localization`: default language and units
//! - `telemetry`: log filter and format

mod cache;
mod database;
mod localization;
mod telemetry;
mod weather;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use localization::LocalizationConfig;
pub use telemetry::TelemetryConfig;
pub use weather::WeatherAppConfig;

/// Environment variable prefix, e.g. `WEATHERBOT_WEATHER__API_KEY`
pub const ENV_PREFIX: &str = "WEATHERBOT";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Language and unit defaults
    #[serde(default)]
    pub localization: LocalizationConfig,

    /// Log output configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.*` in the working
    /// directory when `None`), then apply environment overrides
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("database.path", "weatherbot.db")?
            .set_default("localization.default_language", "en")?
            .add_source(file_source)
            // Override with environment variables (e.g., WEATHERBOT_CACHE__TTL_SECS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
