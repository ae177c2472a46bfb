//! Language and unit defaults.

use std::path::PathBuf;

use domain::{TemperatureUnit, UnitPreferences, WindUnit};
use serde::{Deserialize, Serialize};

/// Defaults for users without stored preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Catalog language used when a user has none (default: `en`)
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Default temperature unit
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Default wind unit
    #[serde(default)]
    pub wind_unit: WindUnit,

    /// Directory of `<lang>.toml` files merged over the built-in catalogs
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            temperature_unit: TemperatureUnit::default(),
            wind_unit: WindUnit::default(),
            catalog_dir: None,
        }
    }
}

impl LocalizationConfig {
    /// Default units as a preference value
    #[must_use]
    pub const fn default_units(&self) -> UnitPreferences {
        UnitPreferences {
            temperature: self.temperature_unit,
            wind: self.wind_unit,
        }
    }
}
