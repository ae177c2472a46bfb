//! Raw WeatherAPI.com response shapes
//!
//! Every field defaults when absent so that a partial provider response still
//! deserializes. Conversion into the canonical payloads lives in
//! [`crate::normalize`].

use serde::{Deserialize, Deserializer};

/// `location` block shared by most endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Local time at the location, e.g. `"2024-01-15 9:05"`
    pub localtime: String,
}

/// `condition` object
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub text: String,
}

/// `current.air_quality` block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AirQualityBlock {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// `current` block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Current {
    pub last_updated: String,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: f64,
    pub wind_kph: f64,
    pub wind_degree: f64,
    pub condition: Condition,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub uv: f64,
    pub air_quality: Option<AirQualityBlock>,
}

/// `astro` block of a forecast day or the astronomy endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub moon_illumination: f64,
}

/// `day` summary of a forecast day
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Day {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    pub maxwind_kph: f64,
    pub totalprecip_mm: f64,
    pub avghumidity: f64,
    pub daily_chance_of_rain: f64,
    pub condition: Condition,
}

/// One entry of `forecastday[].hour`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Hour {
    /// `"YYYY-MM-DD HH:MM"`
    pub time: String,
    pub temp_c: f64,
    pub condition: Condition,
    pub chance_of_rain: f64,
    pub wind_kph: f64,
}

/// One entry of `forecast.forecastday`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastDay {
    pub date: String,
    pub day: Day,
    pub astro: Astro,
    pub hour: Vec<Hour>,
}

/// `forecast` block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

/// One entry of `alerts.alert`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub headline: String,
    pub severity: String,
    pub areas: String,
    pub desc: String,
    pub effective: String,
    pub expires: String,
}

/// `alerts` block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Alerts {
    pub alert: Vec<Alert>,
}

/// Response of `current.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurrentResponse {
    pub location: Location,
    pub current: Current,
}

/// Response of `forecast.json` and `history.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastResponse {
    pub location: Location,
    pub current: Current,
    pub forecast: Forecast,
    pub alerts: Alerts,
}

/// `astronomy` wrapper of `astronomy.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Astronomy {
    pub astro: Astro,
}

/// Response of `astronomy.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AstronomyResponse {
    pub location: Location,
    pub astronomy: Astronomy,
}

/// One element of the `search.json` array
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Error body, e.g. `{"error":{"code":1006,"message":"No matching location found."}}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub code: u32,
    pub message: String,
}

/// Provider error code for an unresolvable `q`
pub const NO_MATCHING_LOCATION: u32 = 1006;

/// Accepts a number, a numeric string or null
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or_default(),
        Some(Raw::Null) | None => 0.0,
    })
}
