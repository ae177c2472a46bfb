//! Weather display helpers
//!
//! Pure functions turning canonical measurements into display strings under
//! the user's unit preferences, and picking emoji for conditions and bands.

use domain::{AqiBand, TemperatureUnit, WindUnit};

/// Longest message the chat transport accepts
pub const MAX_MESSAGE_LEN: usize = 4000;

const KMH_TO_MPH: f64 = 0.621_371;
const KM_TO_MILES: f64 = 0.621_371;
const MB_TO_INHG: f64 = 0.029_53;
const MM_TO_INCHES: f64 = 0.039_370_1;

// ── Units ───────────────────────────────────────────────────────

/// Temperature given in Celsius, e.g. `"21.5°C"` or `"70.7°F"`
#[must_use]
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{celsius:.1}°C"),
        TemperatureUnit::Fahrenheit => format!("{:.1}°F", celsius.mul_add(9.0 / 5.0, 32.0)),
    }
}

/// Wind speed given in km/h
#[must_use]
pub fn format_wind_speed(kph: f64, unit: WindUnit) -> String {
    match unit {
        WindUnit::Kmh => format!("{kph:.1} km/h"),
        WindUnit::Mph => format!("{:.1} mph", kph * KMH_TO_MPH),
    }
}

/// Pressure given in millibars
#[must_use]
pub fn format_pressure(mb: f64, imperial: bool) -> String {
    if imperial {
        format!("{:.2} inHg", mb * MB_TO_INHG)
    } else {
        format!("{mb:.1} mb")
    }
}

/// Visibility given in kilometres
#[must_use]
pub fn format_visibility(km: f64, imperial: bool) -> String {
    if imperial {
        format!("{:.1} miles", km * KM_TO_MILES)
    } else {
        format!("{km:.1} km")
    }
}

/// Precipitation given in millimetres
#[must_use]
pub fn format_precipitation(mm: f64, imperial: bool) -> String {
    if imperial {
        format!("{:.2} in", mm * MM_TO_INCHES)
    } else {
        format!("{mm:.1} mm")
    }
}

/// 16-point compass direction for a bearing in degrees
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn wind_direction(degrees: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = f64::from(degrees % 360);
    let index = ((normalized + 11.25) / 22.5) as usize % 16;
    POINTS[index]
}

// ── Emoji ───────────────────────────────────────────────────────

/// Emoji for a provider condition text
///
/// Matching is case-insensitive on substrings; more specific phrases are
/// checked before the words they contain.
#[must_use]
pub fn weather_emoji(condition: &str) -> &'static str {
    const TABLE: &[(&str, &str)] = &[
        ("partly cloudy", "⛅"),
        ("mostly cloudy", "🌥️"),
        ("light rain", "🌦️"),
        ("heavy rain", "🌧️"),
        ("light snow", "🌨️"),
        ("heavy snow", "❄️"),
        ("thunder", "⛈️"),
        ("storm", "⛈️"),
        ("lightning", "⛈️"),
        ("tornado", "🌪️"),
        ("hurricane", "🌀"),
        ("typhoon", "🌀"),
        ("blizzard", "🌨️"),
        ("sleet", "🌨️"),
        ("drizzle", "🌦️"),
        ("shower", "🌦️"),
        ("rain", "🌧️"),
        ("snow", "❄️"),
        ("sunny", "☀️"),
        ("clear", "☀️"),
        ("fair", "🌤️"),
        ("overcast", "☁️"),
        ("cloudy", "☁️"),
        ("fog", "🌫️"),
        ("mist", "🌫️"),
        ("haze", "🌫️"),
        ("windy", "💨"),
        ("breezy", "💨"),
    ];

    let condition = condition.to_lowercase();
    TABLE
        .iter()
        .find(|(needle, _)| condition.contains(needle))
        .map_or("🌤️", |(_, emoji)| emoji)
}

/// Colored dot for an AQI band
#[must_use]
pub const fn aqi_emoji(band: AqiBand) -> &'static str {
    match band {
        AqiBand::Good => "🟢",
        AqiBand::Moderate => "🟡",
        AqiBand::UnhealthyForSensitiveGroups => "🟠",
        AqiBand::Unhealthy => "🔴",
    }
}

/// UV band label and colored dot
#[must_use]
pub fn uv_band(uv_index: f64) -> (&'static str, &'static str) {
    if uv_index <= 2.0 {
        ("Low", "🟢")
    } else if uv_index <= 5.0 {
        ("Moderate", "🟡")
    } else if uv_index <= 7.0 {
        ("High", "🟠")
    } else if uv_index <= 10.0 {
        ("Very High", "🔴")
    } else {
        ("Extreme", "🟣")
    }
}

/// Colored dot for a provider alert severity
#[must_use]
pub fn severity_emoji(severity: &str) -> &'static str {
    match severity.trim().to_lowercase().as_str() {
        "minor" => "🟡",
        "moderate" => "🟠",
        "severe" => "🔴",
        "extreme" => "🟣",
        _ => "⚠️",
    }
}

/// Emoji for a moon phase name
#[must_use]
pub fn moon_emoji(phase: &str) -> &'static str {
    const PHASES: &[(&str, &str)] = &[
        ("new moon", "🌑"),
        ("waxing crescent", "🌒"),
        ("first quarter", "🌓"),
        ("waxing gibbous", "🌔"),
        ("full moon", "🌕"),
        ("waning gibbous", "🌖"),
        ("third quarter", "🌗"),
        ("last quarter", "🌗"),
        ("waning crescent", "🌘"),
    ];

    let phase = phase.to_lowercase();
    PHASES
        .iter()
        .find(|(name, _)| phase.contains(name))
        .map_or("🌙", |(_, emoji)| emoji)
}

// ── Text ────────────────────────────────────────────────────────

/// Cut `text` to at most `max_chars` characters, ending in `"..."` when cut
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
