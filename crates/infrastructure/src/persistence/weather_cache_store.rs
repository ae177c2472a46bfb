//! SQLite weather cache
//!
//! Implements `WeatherCachePort` on the `weather_cache` table. One row per
//! `(location_key, data_type)`; writes are a single upsert, so the last
//! writer wins.

use std::{sync::Arc, time::Duration};

use application::{
    error::ApplicationError,
    ports::{CacheKey, EvictionReport, WeatherCachePort},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, info, instrument};

use super::{
    connection::ConnectionPool,
    error::{internal, saturating_add, saturating_sub, timestamp},
};

/// Default number of days request-log rows are kept
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 30;

/// SQLite-based weather cache
#[derive(Debug, Clone)]
pub struct SqliteWeatherCache {
    pool: Arc<ConnectionPool>,
    log_retention: TimeDelta,
}

impl SqliteWeatherCache {
    /// Create a cache keeping 30 days of request log
    #[must_use]
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self::with_log_retention_days(pool, DEFAULT_LOG_RETENTION_DAYS)
    }

    /// Create a cache with an explicit request-log retention window
    #[must_use]
    pub fn with_log_retention_days(pool: Arc<ConnectionPool>, days: u32) -> Self {
        Self {
            pool,
            log_retention: TimeDelta::days(i64::from(days)),
        }
    }

    /// Number of rows in the cache, expired or not
    pub async fn len(&self) -> Result<u64, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM weather_cache", [], |row| row.get(0))
                .map_err(internal)?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
        .map_err(internal)?
    }

    /// Whether the cache table has no rows
    pub async fn is_empty(&self) -> Result<bool, ApplicationError> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl WeatherCachePort for SqliteWeatherCache {
    #[instrument(skip(self), fields(key = %key))]
    async fn get_fresh(&self, key: &CacheKey) -> Result<Option<String>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let location = key.location().to_string();
        let data_type = key.data_type().to_string();
        let now = timestamp(Utc::now());

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let payload = conn
                .query_row(
                    "SELECT payload FROM weather_cache
                     WHERE location_key = ?1 AND data_type = ?2 AND expires_at > ?3",
                    params![location, data_type, now],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(internal)?;
            Ok(payload)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self, payload), fields(key = %key, ttl_secs = ttl.as_secs()))]
    async fn put(
        &self,
        key: &CacheKey,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let location = key.location().to_string();
        let data_type = key.data_type().to_string();
        let payload = payload.to_string();
        let now = Utc::now();
        let expires_at = saturating_add(now, TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX));

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            conn.execute(
                "INSERT INTO weather_cache (location_key, data_type, payload, expires_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(location_key, data_type) DO UPDATE SET
                     payload = excluded.payload,
                     expires_at = excluded.expires_at,
                     created_at = excluded.created_at",
                params![
                    location,
                    data_type,
                    payload,
                    timestamp(expires_at),
                    timestamp(now)
                ],
            )
            .map_err(internal)?;
            debug!("Stored cache entry");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self))]
    async fn evict_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<EvictionReport, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let cache_cutoff = timestamp(cutoff);
        let log_cutoff = timestamp(saturating_sub(cutoff, self.log_retention));

        let report = task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(internal)?;
            let tx = conn.transaction().map_err(internal)?;

            let cache_entries = tx
                .execute(
                    "DELETE FROM weather_cache WHERE expires_at < ?1",
                    [&cache_cutoff],
                )
                .map_err(internal)?;
            let request_logs = tx
                .execute(
                    "DELETE FROM weather_requests WHERE created_at < ?1",
                    [&log_cutoff],
                )
                .map_err(internal)?;

            tx.commit().map_err(internal)?;

            Ok::<_, ApplicationError>(EvictionReport {
                cache_entries: cache_entries as u64,
                request_logs: request_logs as u64,
            })
        })
        .await
        .map_err(internal)??;

        info!(
            cache_entries = report.cache_entries,
            request_logs = report.request_logs,
            "Evicted expired rows"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use application::ports::WeatherCachePortExt;
    use domain::{CurrentConditions, LocationQuery, WeatherDataType};

    use super::*;
    use crate::{config::DatabaseConfig, persistence::create_pool};

    fn setup() -> (Arc<ConnectionPool>, SqliteWeatherCache) {
        let pool = Arc::new(create_pool(&DatabaseConfig::in_memory()).unwrap());
        let cache = SqliteWeatherCache::new(Arc::clone(&pool));
        (pool, cache)
    }

    fn key(location: &str) -> CacheKey {
        CacheKey::new(&LocationQuery::parse(location), WeatherDataType::Current)
    }

    #[tokio::test]
    async fn put_then_get_fresh() {
        let (_pool, cache) = setup();
        cache
            .put(&key("Paris"), r#"{"a":1}"#, Duration::from_secs(60))
            .await
            .unwrap();

        let hit = cache.get_fresh(&key("paris")).await.unwrap();
        assert_eq!(hit.as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let (_pool, cache) = setup();
        assert!(cache.get_fresh(&key("Nowhere")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let (_pool, cache) = setup();
        cache
            .put(&key("Oslo"), "{}", Duration::ZERO)
            .await
            .unwrap();
        assert!(cache.get_fresh(&key("Oslo")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_previous_entry() {
        let (_pool, cache) = setup();
        let k = key("Rome");
        cache.put(&k, "1", Duration::from_secs(60)).await.unwrap();
        cache.put(&k, "2", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.len().await.unwrap(), 1);
        assert_eq!(cache.get_fresh(&k).await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn data_types_do_not_collide() {
        let (_pool, cache) = setup();
        let query = LocationQuery::parse("Lima");
        let current = CacheKey::new(&query, WeatherDataType::Current);
        let daily = CacheKey::new(&query, WeatherDataType::Forecast7d);
        cache.put(&current, "c", Duration::from_secs(60)).await.unwrap();
        cache.put(&daily, "d", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_fresh(&current).await.unwrap().as_deref(), Some("c"));
        assert_eq!(cache.get_fresh(&daily).await.unwrap().as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn typed_round_trip() {
        let (_pool, cache) = setup();
        let value = CurrentConditions {
            location: "Tokyo, Japan".into(),
            temperature_c: 25.5,
            ..Default::default()
        };
        cache
            .put_payload(&key("Tokyo"), &value, Duration::from_secs(60))
            .await
            .unwrap();
        let back: Option<CurrentConditions> = cache.get_payload(&key("Tokyo")).await.unwrap();
        assert_eq!(back, Some(value));
    }

    #[tokio::test]
    async fn evicts_expired_entries_and_old_logs() {
        let (pool, cache) = setup();
        cache.put(&key("Old"), "{}", Duration::ZERO).await.unwrap();
        cache
            .put(&key("Fresh"), "{}", Duration::from_secs(3600))
            .await
            .unwrap();
        {
            let conn = pool.get().unwrap();
            let old = timestamp(Utc::now() - TimeDelta::days(45));
            let recent = timestamp(Utc::now() - TimeDelta::days(1));
            for created in [&old, &recent] {
                conn.execute(
                    "INSERT INTO weather_requests (request_id, user_id, location, request_type, created_at)
                     VALUES ('r', 'u', 'x', 'current', ?1)",
                    [created],
                )
                .unwrap();
            }
        }

        let report = cache
            .evict_expired(Utc::now() + TimeDelta::seconds(1))
            .await
            .unwrap();

        assert_eq!(report.cache_entries, 1);
        assert_eq!(report.request_logs, 1);
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn huge_ttl_never_expires() {
        let (_pool, cache) = setup();
        let k = key("Quito");
        cache
            .put(&k, "{}", Duration::from_secs(10_000_000_000_000))
            .await
            .unwrap();
        cache.put(&key("Cusco"), "{}", Duration::MAX).await.unwrap();

        assert!(cache.get_fresh(&k).await.unwrap().is_some());
        let report = cache.evict_expired(Utc::now()).await.unwrap();
        assert_eq!(report.cache_entries, 0);
        assert_eq!(cache.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn huge_log_retention_keeps_every_log() {
        let (pool, _cache) = setup();
        let cache = SqliteWeatherCache::with_log_retention_days(Arc::clone(&pool), u32::MAX);
        {
            let conn = pool.get().unwrap();
            conn.execute(
                "INSERT INTO weather_requests (request_id, user_id, location, request_type, created_at)
                 VALUES ('r', 'u', 'x', 'current', ?1)",
                [timestamp(Utc::now() - TimeDelta::days(400))],
            )
            .unwrap();
        }

        let report = cache.evict_expired(Utc::now()).await.unwrap();
        assert_eq!(report.request_logs, 0);
    }

    #[tokio::test]
    async fn eviction_on_empty_store_reports_zero() {
        let (_pool, cache) = setup();
        let report = cache.evict_expired(Utc::now()).await.unwrap();
        assert_eq!(report, EvictionReport::default());
        assert!(cache.is_empty().await.unwrap());
    }
}
