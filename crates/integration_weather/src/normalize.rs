//! Provider response → canonical payload conversion
//!
//! Pure functions over the raw [`crate::api`] shapes. Absent values come
//! through as zero or empty, never as an error, except where a whole
//! response is unusable (an empty history day list).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, Pollutants, WeatherAlert,
};

use crate::{api, error::WeatherError};

/// Hours shown in the short-range forecast
pub const HOURLY_WINDOW: usize = 12;

/// Days shown in the medium-range forecast
pub const DAILY_WINDOW: usize = 7;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(v: f64) -> u8 {
    if v.is_finite() {
        v.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn degrees(v: f64) -> u16 {
    if v.is_finite() {
        v.round().clamp(0.0, 360.0) as u16
    } else {
        0
    }
}

/// Current conditions from a `forecast.json` (or `current.json`) response
pub fn current_conditions(resp: &api::ForecastResponse) -> CurrentConditions {
    let current = &resp.current;
    let astro = resp.forecast.forecastday.first().map(|d| &d.astro);

    CurrentConditions {
        location: format!("{}, {}", resp.location.name, resp.location.country),
        temperature_c: current.temp_c,
        feels_like_c: current.feelslike_c,
        humidity: percent(current.humidity),
        wind_kph: current.wind_kph,
        wind_degree: degrees(current.wind_degree),
        condition: current.condition.text.clone(),
        pressure_mb: current.pressure_mb,
        visibility_km: current.vis_km,
        uv_index: current.uv,
        sunrise: astro.map(|a| a.sunrise.clone()).unwrap_or_default(),
        sunset: astro.map(|a| a.sunset.clone()).unwrap_or_default(),
        last_updated: current.last_updated.clone(),
    }
}

/// Hour of day from the provider's `localtime` (`"YYYY-MM-DD H:MM"`)
pub fn local_hour(localtime: &str) -> Option<u8> {
    let (_, time) = localtime.trim().split_once(' ')?;
    let (hour, _) = time.split_once(':')?;
    hour.parse::<u8>().ok().filter(|h| *h < 24)
}

fn hour_label(raw_time: &str, hour: u8) -> String {
    let time = NaiveDateTime::parse_from_str(raw_time, "%Y-%m-%d %H:%M")
        .map(|dt| dt.time())
        .ok()
        .or_else(|| NaiveTime::from_hms_opt(u32::from(hour), 0, 0));
    time.map(|t| t.format("%I %p").to_string()).unwrap_or_default()
}

/// The next [`HOURLY_WINDOW`] hours starting at `current_hour`
///
/// Hours past midnight are taken from the second forecast day when the
/// provider returned one, otherwise from today's list at the wrapped index.
/// Indices the provider list does not cover are skipped.
pub fn hourly_window(days: &[api::ForecastDay], current_hour: u8) -> Vec<HourlyForecastEntry> {
    let Some(today) = days.first() else {
        return Vec::new();
    };
    let tomorrow = days.get(1);
    let start = usize::from(current_hour % 24);

    (0..HOURLY_WINDOW)
        .filter_map(|i| {
            let absolute = start + i;
            let index = absolute % 24;
            let source = if absolute >= 24 {
                tomorrow.unwrap_or(today)
            } else {
                today
            };
            let raw = source.hour.get(index)?;
            #[allow(clippy::cast_possible_truncation)]
            let hour = index as u8;
            Some(HourlyForecastEntry {
                hour,
                time: hour_label(&raw.time, hour),
                temperature_c: raw.temp_c,
                condition: raw.condition.text.clone(),
                chance_of_rain: percent(raw.chance_of_rain),
                wind_kph: raw.wind_kph,
            })
        })
        .collect()
}

/// Up to [`DAILY_WINDOW`] days in provider order
pub fn daily_entries(days: &[api::ForecastDay]) -> Vec<DailyForecastEntry> {
    days.iter()
        .take(DAILY_WINDOW)
        .map(|d| {
            let date = NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").ok();
            DailyForecastEntry {
                date,
                label: date.map_or_else(
                    || d.date.clone(),
                    |date| date.format("%a, %b %d").to_string(),
                ),
                min_temp_c: d.day.mintemp_c,
                max_temp_c: d.day.maxtemp_c,
                condition: d.day.condition.text.clone(),
                chance_of_rain: percent(d.day.daily_chance_of_rain),
                avg_humidity: percent(d.day.avghumidity),
            }
        })
        .collect()
}

/// Air quality from a `current.json?aqi=yes` response
pub fn air_quality(resp: &api::CurrentResponse) -> AirQuality {
    let block = resp.current.air_quality.as_ref();
    let pollutants = block.map_or_else(Pollutants::default, |aq| Pollutants {
        co: aq.co,
        no2: aq.no2,
        o3: aq.o3,
        pm2_5: aq.pm2_5,
        pm10: aq.pm10,
    });
    AirQuality::from_pollutants(pollutants)
}

/// Active alerts, possibly none
pub fn alerts(resp: &api::ForecastResponse) -> Vec<WeatherAlert> {
    resp.alerts
        .alert
        .iter()
        .map(|a| WeatherAlert {
            title: a.headline.clone(),
            description: a.desc.clone(),
            severity: a.severity.clone(),
            effective: a.effective.clone(),
            expires: a.expires.clone(),
            areas: a.areas.clone(),
        })
        .collect()
}

/// Sun and moon data from an `astronomy.json` response
pub fn astronomy(resp: &api::AstronomyResponse) -> AstronomyData {
    let astro = &resp.astronomy.astro;
    AstronomyData {
        sunrise: astro.sunrise.clone(),
        sunset: astro.sunset.clone(),
        moonrise: astro.moonrise.clone(),
        moonset: astro.moonset.clone(),
        moon_phase: astro.moon_phase.clone(),
        moon_illumination: astro.moon_illumination,
    }
}

/// Search hits, at most `limit`
pub fn location_matches(hits: Vec<api::SearchHit>, limit: usize) -> Vec<LocationMatch> {
    hits.into_iter()
        .take(limit)
        .map(|h| LocationMatch {
            name: h.name,
            region: h.region,
            country: h.country,
            latitude: h.lat,
            longitude: h.lon,
        })
        .collect()
}

/// The observed day of a `history.json` response
///
/// # Errors
///
/// Returns `WeatherError::ParseError` when the provider returned no day.
pub fn historical_day(
    resp: &api::ForecastResponse,
    requested: NaiveDate,
) -> Result<HistoricalDay, WeatherError> {
    let first = resp.forecast.forecastday.first().ok_or_else(|| {
        WeatherError::ParseError(format!("No historical data for {requested}"))
    })?;
    let day = &first.day;

    Ok(HistoricalDay {
        date: NaiveDate::parse_from_str(&first.date, "%Y-%m-%d")
            .ok()
            .or(Some(requested)),
        max_temp_c: day.maxtemp_c,
        min_temp_c: day.mintemp_c,
        avg_temp_c: day.avgtemp_c,
        condition: day.condition.text.clone(),
        total_precip_mm: day.totalprecip_mm,
        avg_humidity: percent(day.avghumidity),
        max_wind_kph: day.maxwind_kph,
    })
}
