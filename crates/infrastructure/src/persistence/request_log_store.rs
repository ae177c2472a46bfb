//! SQLite request log
//!
//! Implements `RequestLogPort` on the append-only `weather_requests` table.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{AnalyticsSummary, LanguageCount, LocationCount, RequestLogPort, UserStats},
};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use domain::{RequestLogRecord, UserId};
use rusqlite::{Connection, params};
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{internal, saturating_sub, timestamp},
};

const USER_TOP_LOCATIONS: u32 = 5;
const SUMMARY_TOP_LOCATIONS: u32 = 10;
const SUMMARY_WINDOW_DAYS: i64 = 7;

/// SQLite-based request log
#[derive(Debug, Clone)]
pub struct SqliteRequestLog {
    pool: Arc<ConnectionPool>,
}

impl SqliteRequestLog {
    /// Create a new request log
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

fn top_locations(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
    limit: u32,
) -> Result<Vec<LocationCount>, ApplicationError> {
    let sql = format!(
        "SELECT location, COUNT(*) AS n FROM weather_requests
         WHERE {filter}
         GROUP BY location
         ORDER BY n DESC, location ASC
         LIMIT {limit}"
    );
    let mut stmt = conn.prepare(&sql).map_err(internal)?;
    let rows = stmt
        .query_map(args, |row| {
            Ok(LocationCount {
                location: row.get(0)?,
                count: to_u64(row.get(1)?),
            })
        })
        .map_err(internal)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(internal)?;
    Ok(rows)
}

#[async_trait]
impl RequestLogPort for SqliteRequestLog {
    #[instrument(skip(self, record), fields(request_id = %record.request_id, success = record.success))]
    async fn record(&self, record: &RequestLogRecord) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let record = record.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            conn.execute(
                "INSERT INTO weather_requests (request_id, user_id, location, request_type,
                     response_time_ms, success, error_message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.request_id.to_string(),
                    record.user_id.as_str(),
                    record.location,
                    record.request_type.as_str(),
                    i64::try_from(record.response_time_ms).unwrap_or(i64::MAX),
                    i32::from(record.success),
                    record.error_message,
                    timestamp(record.created_at),
                ],
            )
            .map_err(internal)?;
            debug!("Recorded weather request");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn user_stats(&self, user: &UserId, days: u32) -> Result<UserStats, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.as_str().to_string();
        let since = timestamp(saturating_sub(Utc::now(), TimeDelta::days(i64::from(days))));

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let (total, successful, avg): (i64, Option<i64>, Option<f64>) = conn
                .query_row(
                    "SELECT COUNT(*), SUM(success), AVG(response_time_ms)
                     FROM weather_requests WHERE user_id = ?1 AND created_at >= ?2",
                    params![user, since],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .map_err(internal)?;

            let top = top_locations(
                &conn,
                "user_id = ?1 AND created_at >= ?2",
                &[&user, &since],
                USER_TOP_LOCATIONS,
            )?;

            Ok(UserStats {
                total_requests: to_u64(total),
                successful_requests: to_u64(successful.unwrap_or(0)),
                avg_response_ms: avg.unwrap_or(0.0),
                top_locations: top,
            })
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self))]
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let now = Utc::now();
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map_or(now, |dt| dt.and_utc());
        let today = timestamp(midnight);
        let week = timestamp(saturating_sub(now, TimeDelta::days(SUMMARY_WINDOW_DAYS)));

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;

            let total_users: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM (
                         SELECT user_id FROM weather_requests
                         UNION
                         SELECT user_id FROM user_preferences
                     )",
                    [],
                    |row| row.get(0),
                )
                .map_err(internal)?;

            let requests_today: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM weather_requests WHERE created_at >= ?1",
                    [&today],
                    |row| row.get(0),
                )
                .map_err(internal)?;

            let top = top_locations(&conn, "created_at >= ?1", &[&week], SUMMARY_TOP_LOCATIONS)?;

            let mut stmt = conn
                .prepare(
                    "SELECT language_code, COUNT(*) AS n FROM user_preferences
                     WHERE language_code IS NOT NULL
                     GROUP BY language_code
                     ORDER BY n DESC, language_code ASC",
                )
                .map_err(internal)?;
            let languages = stmt
                .query_map([], |row| {
                    Ok(LanguageCount {
                        language: row.get(0)?,
                        users: to_u64(row.get(1)?),
                    })
                })
                .map_err(internal)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(internal)?;

            Ok(AnalyticsSummary {
                total_users: to_u64(total_users),
                requests_today: to_u64(requests_today),
                top_locations: top,
                languages,
            })
        })
        .await
        .map_err(internal)?
    }
}
