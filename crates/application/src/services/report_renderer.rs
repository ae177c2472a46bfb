//! Localized chat text for canonical weather payloads

use std::{fmt, fmt::Write as _, sync::Arc};

use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, UnitPreferences, WeatherAlert,
};

use super::{
    weather_formatter::{
        MAX_MESSAGE_LEN, aqi_emoji, format_precipitation, format_pressure, format_temperature,
        format_visibility, format_wind_speed, moon_emoji, severity_emoji, truncate_text, uv_band,
        weather_emoji, wind_direction,
    },
    weather_service::FullReport,
};
use crate::ports::TextLookupPort;

/// Renders payloads into HTML-flavoured chat messages
///
/// Every rendered message is cut to the transport's message limit.
#[derive(Clone)]
pub struct ReportRenderer {
    text: Arc<dyn TextLookupPort>,
}

impl fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportRenderer").finish_non_exhaustive()
    }
}

impl ReportRenderer {
    /// Create a renderer over a text catalog
    pub fn new(text: Arc<dyn TextLookupPort>) -> Self {
        Self { text }
    }

    /// Localized text for `key`
    #[must_use]
    pub fn t(&self, key: &str, language: &str) -> String {
        self.text.text(key, language)
    }

    /// `language` if the catalog has it, otherwise the default language
    #[must_use]
    pub fn resolve_language(&self, language: Option<&str>) -> String {
        let supported = self.text.supported_languages();
        match language {
            Some(lang) if supported.iter().any(|l| l == lang) => lang.to_string(),
            _ => self.text.default_language(),
        }
    }

    /// Current conditions card
    #[must_use]
    pub fn current(
        &self,
        current: &CurrentConditions,
        language: &str,
        units: UnitPreferences,
    ) -> String {
        if *current == CurrentConditions::default() {
            return self.no_data(language);
        }
        let t = |key: &str| self.t(key, language);
        let imperial = units.imperial_distances();
        let (uv_label, uv_dot) = uv_band(current.uv_index);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} <b>{}</b>",
            weather_emoji(&current.condition),
            t("current_weather")
        );
        let _ = writeln!(out, "📍 {}: {}", t("location"), current.location);
        if !current.last_updated.is_empty() {
            let _ = writeln!(out, "🕐 {}: {}", t("local_time"), current.last_updated);
        }
        let _ = writeln!(
            out,
            "🌡️ {}: {} ({}: {})",
            t("temperature"),
            format_temperature(current.temperature_c, units.temperature),
            t("feels_like"),
            format_temperature(current.feels_like_c, units.temperature)
        );
        let _ = writeln!(out, "💧 {}: {}%", t("humidity"), current.humidity);
        let _ = writeln!(
            out,
            "💨 {}: {} {} {} ({}°)",
            t("wind"),
            format_wind_speed(current.wind_kph, units.wind),
            t("from"),
            wind_direction(current.wind_degree),
            current.wind_degree
        );
        let _ = writeln!(
            out,
            "🧭 {}: {}",
            t("pressure"),
            format_pressure(current.pressure_mb, imperial)
        );
        let _ = writeln!(
            out,
            "👁️ {}: {}",
            t("visibility"),
            format_visibility(current.visibility_km, imperial)
        );
        let _ = writeln!(
            out,
            "{uv_dot} {}: {:.1} ({uv_label})",
            t("uv_index"),
            current.uv_index
        );
        let _ = writeln!(out, "🌅 {}: {}", t("sunrise"), current.sunrise);
        let _ = writeln!(out, "🌇 {}: {}", t("sunset"), current.sunset);
        let _ = write!(out, "☁️ {}: {}", t("weather"), current.condition);

        truncate_text(&out, MAX_MESSAGE_LEN)
    }

    /// 12-hour list
    #[must_use]
    pub fn hourly(
        &self,
        entries: &[HourlyForecastEntry],
        language: &str,
        units: UnitPreferences,
    ) -> String {
        if entries.is_empty() {
            return self.no_data(language);
        }
        let mut out = format!("📊 <b>{}</b>\n\n", self.t("12h_forecast_title", language));
        for entry in entries {
            let _ = writeln!(
                out,
                "{}: {} {} {} 💧{}%",
                entry.time,
                format_temperature(entry.temperature_c, units.temperature),
                weather_emoji(&entry.condition),
                entry.condition,
                entry.chance_of_rain
            );
        }
        truncate_text(out.trim_end(), MAX_MESSAGE_LEN)
    }

    /// 7-day list
    #[must_use]
    pub fn daily(
        &self,
        entries: &[DailyForecastEntry],
        language: &str,
        units: UnitPreferences,
    ) -> String {
        if entries.is_empty() {
            return self.no_data(language);
        }
        let mut out = format!("📅 <b>{}</b>\n\n", self.t("7d_forecast_title", language));
        for entry in entries {
            let _ = writeln!(
                out,
                "{}: {}/{} {} {} 💧{}%",
                entry.label,
                format_temperature(entry.min_temp_c, units.temperature),
                format_temperature(entry.max_temp_c, units.temperature),
                weather_emoji(&entry.condition),
                entry.condition,
                entry.chance_of_rain
            );
        }
        truncate_text(out.trim_end(), MAX_MESSAGE_LEN)
    }

    /// Air quality card
    #[must_use]
    pub fn air_quality(&self, air: &AirQuality, language: &str) -> String {
        let p = &air.pollutants;
        let mut out = format!("🌬️ <b>{}</b>\n\n", self.t("air_quality_title", language));
        let _ = writeln!(
            out,
            "{}: {} ({}) {}\n",
            self.t("overall_aqi", language),
            air.aqi,
            air.band.label(),
            aqi_emoji(air.band)
        );
        let _ = writeln!(out, "CO: {:.2} µg/m³", p.co);
        let _ = writeln!(out, "NO₂: {:.2} µg/m³", p.no2);
        let _ = writeln!(out, "O₃: {:.2} µg/m³", p.o3);
        let _ = writeln!(out, "PM2.5: {:.2} µg/m³", p.pm2_5);
        let _ = write!(out, "PM10: {:.2} µg/m³", p.pm10);
        truncate_text(&out, MAX_MESSAGE_LEN)
    }

    /// Alert list, or the no-alerts line
    #[must_use]
    pub fn alerts(&self, alerts: &[WeatherAlert], language: &str) -> String {
        if alerts.is_empty() {
            return format!("✅ {}", self.t("no_active_alerts", language));
        }
        let mut out = format!("⚠️ <b>{}</b>\n\n", self.t("weather_alerts_title", language));
        for alert in alerts {
            let _ = writeln!(out, "{} {}", severity_emoji(&alert.severity), alert.title);
            if !alert.areas.is_empty() {
                let _ = writeln!(out, "🗺️ {}: {}", self.t("areas", language), alert.areas);
            }
            let _ = writeln!(out, "📅 {} - {}", alert.effective, alert.expires);
            let _ = writeln!(out, "📝 {}\n", alert.description);
        }
        truncate_text(out.trim_end(), MAX_MESSAGE_LEN)
    }

    /// Sun and moon card
    #[must_use]
    pub fn astronomy(&self, astro: &AstronomyData, location: &str, language: &str) -> String {
        let t = |key: &str| self.t(key, language);
        let mut out = format!("🔭 <b>{}</b>\n", t("astronomy_title"));
        let _ = writeln!(out, "📍 {}: {location}\n", t("location"));
        let _ = writeln!(out, "🌅 {}: {}", t("sunrise"), astro.sunrise);
        let _ = writeln!(out, "🌇 {}: {}", t("sunset"), astro.sunset);
        let _ = writeln!(out, "🌙 {}: {}", t("moonrise"), astro.moonrise);
        let _ = writeln!(out, "🌚 {}: {}", t("moonset"), astro.moonset);
        let _ = write!(
            out,
            "{} {}: {} ({:.0}% {})",
            moon_emoji(&astro.moon_phase),
            t("moon_phase"),
            astro.moon_phase,
            astro.moon_illumination,
            t("illumination")
        );
        truncate_text(&out, MAX_MESSAGE_LEN)
    }

    /// Numbered search result list
    #[must_use]
    pub fn search_results(&self, matches: &[LocationMatch], language: &str) -> String {
        if matches.is_empty() {
            return format!("🔍 {}", self.t("no_locations_found", language));
        }
        let mut out = format!("🔍 <b>{}</b>\n\n", self.t("search_results_title", language));
        for (i, m) in matches.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({:.2}, {:.2})",
                i + 1,
                m.display_name(),
                m.latitude,
                m.longitude
            );
        }
        truncate_text(out.trim_end(), MAX_MESSAGE_LEN)
    }

    /// Past-day card
    #[must_use]
    pub fn history(
        &self,
        day: &HistoricalDay,
        location: &str,
        language: &str,
        units: UnitPreferences,
    ) -> String {
        let t = |key: &str| self.t(key, language);
        let date = day
            .date
            .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string());

        let mut out = format!("🗓️ <b>{}</b> {date}\n", t("history_title"));
        let _ = writeln!(out, "📍 {}: {location}\n", t("location"));
        let _ = writeln!(
            out,
            "🌡️ {}: {} / {} ({}: {})",
            t("temperature"),
            format_temperature(day.min_temp_c, units.temperature),
            format_temperature(day.max_temp_c, units.temperature),
            t("average"),
            format_temperature(day.avg_temp_c, units.temperature)
        );
        let _ = writeln!(
            out,
            "🌧️ {}: {}",
            t("precipitation"),
            format_precipitation(day.total_precip_mm, units.imperial_distances())
        );
        let _ = writeln!(out, "💧 {}: {}%", t("humidity"), day.avg_humidity);
        let _ = writeln!(
            out,
            "💨 {}: {}",
            t("max_wind"),
            format_wind_speed(day.max_wind_kph, units.wind)
        );
        let _ = write!(
            out,
            "{} {}: {}",
            weather_emoji(&day.condition),
            t("weather"),
            day.condition
        );
        truncate_text(&out, MAX_MESSAGE_LEN)
    }

    /// All four sections of a full report; failed sections show an error line
    #[must_use]
    pub fn full_report(&self, report: &FullReport, language: &str, units: UnitPreferences) -> String {
        let sections = [
            report
                .current
                .as_ref()
                .map_or_else(|e| self.error_line(e, language), |c| self.current(c, language, units)),
            report
                .hourly
                .as_ref()
                .map_or_else(|e| self.error_line(e, language), |h| self.hourly(h, language, units)),
            report
                .daily
                .as_ref()
                .map_or_else(|e| self.error_line(e, language), |d| self.daily(d, language, units)),
            report
                .air_quality
                .as_ref()
                .map_or_else(|e| self.error_line(e, language), |a| self.air_quality(a, language)),
        ];
        truncate_text(&sections.join("\n\n"), MAX_MESSAGE_LEN)
    }

    /// `"<error_occurred>: <detail>"`
    #[must_use]
    pub fn error_line(&self, detail: &impl fmt::Display, language: &str) -> String {
        truncate_text(
            &format!("❌ {}: {detail}", self.t("error_occurred", language)),
            MAX_MESSAGE_LEN,
        )
    }

    /// Placeholder for an empty payload
    #[must_use]
    pub fn no_data(&self, language: &str) -> String {
        self.t("no_data", language)
    }
}
