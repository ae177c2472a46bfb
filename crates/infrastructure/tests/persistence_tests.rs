//! Integration tests for the SQLite stores against an on-disk database
//!
//! Each test gets its own temporary directory; pools are dropped and
//! reopened to check that state survives restarts.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{path::Path, sync::Arc, time::Duration};

use application::ports::{
    CacheKey, FavoriteLocation, PreferencePort, RequestLogPort, WeatherCachePort,
};
use chrono::{TimeDelta, Utc};
use domain::{LocationQuery, RequestLogRecord, UnitPreferences, UserId, WeatherDataType};
use infrastructure::{
    DatabaseConfig, SqlitePreferenceStore, SqliteRequestLog, SqliteWeatherCache, create_pool,
    persistence::migrations::{SCHEMA_VERSION, get_schema_version},
};

// ============================================================================
// Test Helpers
// ============================================================================

fn file_config(dir: &Path) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.join("weather.db").to_string_lossy().into_owned(),
        max_connections: 4,
        run_migrations: true,
    }
}

fn open(dir: &Path) -> Arc<infrastructure::ConnectionPool> {
    Arc::new(create_pool(&file_config(dir)).expect("Failed to open database"))
}

fn key(location: &str, data_type: WeatherDataType) -> CacheKey {
    CacheKey::new(&LocationQuery::parse(location), data_type)
}

// ============================================================================
// Schema
// ============================================================================

#[test]
fn creates_database_file_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open(dir.path());

    assert!(dir.path().join("weather.db").exists());
    let conn = pool.get().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
}

#[test]
fn creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("bot");
    let _pool = open(&nested);
    assert!(nested.join("weather.db").exists());
}

#[test]
fn reopening_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    drop(open(dir.path()));
    let pool = open(dir.path());
    let conn = pool.get().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
}

// ============================================================================
// Cache
// ============================================================================

#[tokio::test]
async fn cache_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let cache = SqliteWeatherCache::new(open(dir.path()));
        cache
            .put(
                &key("Berlin", WeatherDataType::Current),
                r#"{"temperature_c":3.0}"#,
                Duration::from_secs(600),
            )
            .await
            .unwrap();
    }

    let cache = SqliteWeatherCache::new(open(dir.path()));
    let hit = cache
        .get_fresh(&key("BERLIN", WeatherDataType::Current))
        .await
        .unwrap();
    assert_eq!(hit.as_deref(), Some(r#"{"temperature_c":3.0}"#));
}

#[tokio::test]
async fn concurrent_writers_share_the_pool() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(SqliteWeatherCache::new(open(dir.path())));

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache
                .put(
                    &key(&format!("City {i}"), WeatherDataType::Forecast7d),
                    "[]",
                    Duration::from_secs(60),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(cache.len().await.unwrap(), 8);
}

#[tokio::test]
async fn same_key_written_concurrently_keeps_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(SqliteWeatherCache::new(open(dir.path())));
    let k = key("Lisbon", WeatherDataType::Current);

    let writes = (0..6).map(|i| {
        let cache = Arc::clone(&cache);
        let k = k.clone();
        tokio::spawn(async move {
            cache
                .put(&k, &i.to_string(), Duration::from_secs(60))
                .await
        })
    });
    for handle in writes.collect::<Vec<_>>() {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(cache.len().await.unwrap(), 1);
    assert!(cache.get_fresh(&k).await.unwrap().is_some());
}

#[tokio::test]
async fn eviction_respects_log_retention() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open(dir.path());
    let cache = SqliteWeatherCache::with_log_retention_days(Arc::clone(&pool), 7);
    let log = SqliteRequestLog::new(Arc::clone(&pool));

    let mut old = RequestLogRecord::success(
        UserId::new("1"),
        "Oslo",
        WeatherDataType::Current,
        Duration::from_millis(20),
    );
    old.created_at = Utc::now() - TimeDelta::days(10);
    log.record(&old).await.unwrap();
    log.record(&RequestLogRecord::success(
        UserId::new("1"),
        "Oslo",
        WeatherDataType::Current,
        Duration::from_millis(20),
    ))
    .await
    .unwrap();

    let report = cache.evict_expired(Utc::now()).await.unwrap();
    assert_eq!(report.request_logs, 1);

    let stats = log.user_stats(&UserId::new("1"), 30).await.unwrap();
    assert_eq!(stats.total_requests, 1);
}

// ============================================================================
// Preferences
// ============================================================================

#[tokio::test]
async fn preferences_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let user = UserId::new("123456");
    {
        let store = SqlitePreferenceStore::new(open(dir.path()));
        store.set_language(&user, "de").await.unwrap();
        store
            .set_units(&user, UnitPreferences::imperial())
            .await
            .unwrap();
        store
            .add_favorite(&user, &FavoriteLocation::new("Munich").as_default())
            .await
            .unwrap();
    }

    let store = SqlitePreferenceStore::new(open(dir.path()));
    assert_eq!(store.language(&user).await.unwrap().as_deref(), Some("de"));
    assert_eq!(
        store.units(&user).await.unwrap(),
        Some(UnitPreferences::imperial())
    );
    let favorites = store.favorites(&user).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites[0].is_default);
}

#[tokio::test]
async fn analytics_see_preference_only_users() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open(dir.path());
    let prefs = SqlitePreferenceStore::new(Arc::clone(&pool));
    let log = SqliteRequestLog::new(Arc::clone(&pool));

    prefs.set_language(&UserId::new("a"), "fr").await.unwrap();
    log.record(&RequestLogRecord::failure(
        UserId::new("b"),
        "Atlantis",
        WeatherDataType::Current,
        Duration::from_millis(300),
        "No matching location found.",
    ))
    .await
    .unwrap();

    let summary = log.analytics_summary().await.unwrap();
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.requests_today, 1);
    assert_eq!(summary.languages.len(), 1);
    assert_eq!(summary.languages[0].language, "fr");
}
