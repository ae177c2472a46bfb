//! Shared error mapping for the SQLite stores

use application::error::ApplicationError;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Utc};

/// Map a storage error (pool, SQLite, serialization) to an application error
pub fn internal(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Internal(format!("Database error: {e}"))
}

/// Fixed-width UTC timestamp, so that text comparison orders by time
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Latest instant that still formats with a four-digit year
fn latest_stored() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |dt| dt.and_utc())
}

/// Earliest instant that still formats with a four-digit year
fn earliest_stored() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(DateTime::<Utc>::MIN_UTC, |dt| dt.and_utc())
}

/// `at + delta`, clamped to the range `timestamp` keeps ordered
pub fn saturating_add(at: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    let latest = latest_stored();
    at.checked_add_signed(delta).map_or(latest, |t| t.min(latest))
}

/// `at - delta`, clamped to the range `timestamp` keeps ordered
pub fn saturating_sub(at: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    let earliest = earliest_stored();
    at.checked_sub_signed(delta).map_or(earliest, |t| t.max(earliest))
}

/// Parse a stored timestamp, falling back to now for malformed values
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
