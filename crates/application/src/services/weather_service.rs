//! Weather request orchestration
//!
//! For every request: validate the location, try the cache, otherwise fetch
//! from the provider and store the result, and write exactly one request-log
//! record. Cache and log failures degrade to a warning; provider failures are
//! returned to the caller as values.

use std::{
    fmt,
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::NaiveDate;
use domain::{
    AirQuality, AstronomyData, CurrentConditions, DailyForecastEntry, DomainError, HistoricalDay,
    HourlyForecastEntry, LocationMatch, LocationQuery, RequestLogRecord, UserId, WeatherAlert,
    WeatherDataType,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CacheKey, RequestLogPort, WeatherCachePort, WeatherCachePortExt, WeatherPort},
};

/// Default lifetime of cached payloads (10 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Default lifetime of cached history payloads (24 hours)
pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Caching behaviour of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherServiceConfig {
    /// Read and write the cache at all
    pub cache_enabled: bool,
    /// Lifetime of current/forecast/air-quality/astronomy/search payloads
    pub ttl: Duration,
    /// Lifetime of history payloads
    pub history_ttl: Duration,
}

impl Default for WeatherServiceConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            ttl: DEFAULT_CACHE_TTL,
            history_ttl: DEFAULT_HISTORY_TTL,
        }
    }
}

/// The four categories of a full report, each with its own outcome
#[derive(Debug)]
pub struct FullReport {
    /// Current conditions
    pub current: Result<CurrentConditions, ApplicationError>,
    /// Next 12 hours
    pub hourly: Result<Vec<HourlyForecastEntry>, ApplicationError>,
    /// Next 7 days
    pub daily: Result<Vec<DailyForecastEntry>, ApplicationError>,
    /// Air quality
    pub air_quality: Result<AirQuality, ApplicationError>,
}

/// Per-request bookkeeping handed to the miss path
struct RequestMeta {
    user: UserId,
    location: String,
    data_type: WeatherDataType,
    key: Option<CacheKey>,
    ttl: Duration,
    started: Instant,
}

/// Request orchestrator
#[derive(Clone)]
pub struct WeatherService {
    weather: Arc<dyn WeatherPort>,
    cache: Arc<dyn WeatherCachePort>,
    request_log: Arc<dyn RequestLogPort>,
    config: WeatherServiceConfig,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    /// Create a service with default caching
    pub fn new(
        weather: Arc<dyn WeatherPort>,
        cache: Arc<dyn WeatherCachePort>,
        request_log: Arc<dyn RequestLogPort>,
    ) -> Self {
        Self::with_config(weather, cache, request_log, WeatherServiceConfig::default())
    }

    /// Create a service with explicit caching behaviour
    pub fn with_config(
        weather: Arc<dyn WeatherPort>,
        cache: Arc<dyn WeatherCachePort>,
        request_log: Arc<dyn RequestLogPort>,
        config: WeatherServiceConfig,
    ) -> Self {
        Self {
            weather,
            cache,
            request_log,
            config,
        }
    }

    /// Current caching behaviour
    pub const fn config(&self) -> &WeatherServiceConfig {
        &self.config
    }

    /// Current conditions
    #[instrument(skip(self), fields(user = %user))]
    pub async fn current(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<CurrentConditions, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::Current, None);
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_current(&query).await
        })
        .await
    }

    /// Next 12 hours
    #[instrument(skip(self), fields(user = %user))]
    pub async fn hourly_forecast(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<Vec<HourlyForecastEntry>, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::Forecast12h, None);
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_hourly_forecast(&query).await
        })
        .await
    }

    /// Next 7 days
    #[instrument(skip(self), fields(user = %user))]
    pub async fn daily_forecast(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<Vec<DailyForecastEntry>, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::Forecast7d, None);
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_daily_forecast(&query).await
        })
        .await
    }

    /// Air quality
    #[instrument(skip(self), fields(user = %user))]
    pub async fn air_quality(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<AirQuality, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::AirQuality, None);
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_air_quality(&query).await
        })
        .await
    }

    /// Active alerts, always fetched fresh
    #[instrument(skip(self), fields(user = %user))]
    pub async fn alerts(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<Vec<WeatherAlert>, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::Alerts, None);
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_alerts(&query).await
        })
        .await
    }

    /// Sun and moon data for `date`
    #[instrument(skip(self), fields(user = %user))]
    pub async fn astronomy(
        &self,
        user: &UserId,
        location: &str,
        date: NaiveDate,
    ) -> Result<AstronomyData, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::Astronomy, Some(date));
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_astronomy(&query, date).await
        })
        .await
    }

    /// Locations matching free text
    #[instrument(skip(self), fields(user = %user))]
    pub async fn search_locations(
        &self,
        user: &UserId,
        text: &str,
    ) -> Result<Vec<LocationMatch>, ApplicationError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(DomainError::ValidationError("search text must not be empty".into()).into());
        }
        let meta = RequestMeta {
            user: user.clone(),
            location: text.clone(),
            data_type: WeatherDataType::Search,
            key: self.config.cache_enabled.then(|| CacheKey::search(&text)),
            ttl: self.config.ttl,
            started: Instant::now(),
        };
        self.orchestrate(meta, move |weather| async move {
            weather.search_locations(&text).await
        })
        .await
    }

    /// Observed weather for a past `date`
    #[instrument(skip(self), fields(user = %user))]
    pub async fn historical(
        &self,
        user: &UserId,
        location: &str,
        date: NaiveDate,
    ) -> Result<HistoricalDay, ApplicationError> {
        let query = LocationQuery::try_parse(location)?;
        let meta = self.meta(user, &query, WeatherDataType::History, Some(date));
        self.orchestrate(meta, move |weather| async move {
            weather.fetch_historical(&query, date).await
        })
        .await
    }

    /// Current, 12-hour, 7-day and air quality, fetched concurrently
    ///
    /// # Errors
    ///
    /// Only an unusable location fails the whole report; provider failures
    /// land in the individual slots.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn full_report(
        &self,
        user: &UserId,
        location: &str,
    ) -> Result<FullReport, ApplicationError> {
        LocationQuery::try_parse(location)?;

        let (current, hourly, daily, air_quality) = tokio::join!(
            self.current(user, location),
            self.hourly_forecast(user, location),
            self.daily_forecast(user, location),
            self.air_quality(user, location),
        );

        Ok(FullReport {
            current,
            hourly,
            daily,
            air_quality,
        })
    }

    fn meta(
        &self,
        user: &UserId,
        query: &LocationQuery,
        data_type: WeatherDataType,
        date: Option<NaiveDate>,
    ) -> RequestMeta {
        let key = (self.config.cache_enabled && data_type.is_cacheable()).then(|| match date {
            Some(date) if data_type == WeatherDataType::History || data_type == WeatherDataType::Astronomy => {
                CacheKey::dated(query, data_type, date)
            },
            _ => CacheKey::new(query, data_type),
        });
        let ttl = if data_type == WeatherDataType::History {
            self.config.history_ttl
        } else {
            self.config.ttl
        };

        RequestMeta {
            user: user.clone(),
            location: query.raw().to_string(),
            data_type,
            key,
            ttl,
            started: Instant::now(),
        }
    }

    async fn orchestrate<T, F, Fut>(&self, meta: RequestMeta, fetch: F) -> Result<T, ApplicationError>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: FnOnce(Arc<dyn WeatherPort>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApplicationError>> + Send + 'static,
    {
        if let Some(key) = &meta.key {
            match self.cache.get_payload::<T>(key).await {
                Ok(Some(value)) => {
                    debug!(key = %key, "Cache hit");
                    write_log(
                        self.request_log.as_ref(),
                        RequestLogRecord::success(
                            meta.user,
                            meta.location,
                            meta.data_type,
                            meta.started.elapsed(),
                        ),
                    )
                    .await;
                    return Ok(value);
                },
                Ok(None) => debug!(key = %key, "Cache miss"),
                Err(e) => warn!(key = %key, error = %e, "Cache read failed, fetching"),
            }
        }

        // The miss path runs detached so that a caller giving up does not
        // lose the cache write or the log record.
        let weather = Arc::clone(&self.weather);
        let cache = Arc::clone(&self.cache);
        let request_log = Arc::clone(&self.request_log);
        let handle = tokio::spawn(async move {
            let result = fetch(weather).await;
            let elapsed = meta.started.elapsed();

            let record = match &result {
                Ok(value) => {
                    if let Some(key) = &meta.key {
                        if let Err(e) = cache.put_payload(key, value, meta.ttl).await {
                            warn!(key = %key, error = %e, "Cache write failed");
                        }
                    }
                    info!(
                        location = %meta.location,
                        data_type = %meta.data_type,
                        elapsed_ms = elapsed.as_millis(),
                        "Fetched weather data"
                    );
                    RequestLogRecord::success(meta.user, meta.location, meta.data_type, elapsed)
                },
                Err(e) => {
                    warn!(
                        location = %meta.location,
                        data_type = %meta.data_type,
                        elapsed_ms = elapsed.as_millis(),
                        error = %e,
                        transient = e.is_retryable(),
                        user_error = e.is_user_correctable(),
                        "Weather request failed"
                    );
                    RequestLogRecord::failure(
                        meta.user,
                        meta.location,
                        meta.data_type,
                        elapsed,
                        e.to_string(),
                    )
                },
            };
            write_log(request_log.as_ref(), record).await;
            result
        });

        handle
            .await
            .map_err(|e| ApplicationError::Internal(format!("Weather task failed: {e}")))?
    }
}

async fn write_log(log: &dyn RequestLogPort, record: RequestLogRecord) {
    if let Err(e) = log.record(&record).await {
        warn!(request_id = %record.request_id, error = %e, "Failed to write request log");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use domain::LocationQuery;
    use tokio::sync::Mutex;

    use super::*;
    use crate::ports::{
        AnalyticsSummary, EvictionReport, MockRequestLogPort, MockWeatherCachePort,
        MockWeatherPort, UserStats,
    };

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<CacheKey, (String, Duration)>>,
        puts: AtomicUsize,
    }

    #[async_trait]
    impl WeatherCachePort for MemoryCache {
        async fn get_fresh(&self, key: &CacheKey) -> Result<Option<String>, ApplicationError> {
            Ok(self.entries.lock().await.get(key).map(|(v, _)| v.clone()))
        }

        async fn put(
            &self,
            key: &CacheKey,
            payload: &str,
            ttl: Duration,
        ) -> Result<(), ApplicationError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .await
                .insert(key.clone(), (payload.to_string(), ttl));
            Ok(())
        }

        async fn evict_expired(
            &self,
            _cutoff: DateTime<Utc>,
        ) -> Result<EvictionReport, ApplicationError> {
            Ok(EvictionReport::default())
        }
    }

    #[derive(Default)]
    struct MemoryLog {
        records: Mutex<Vec<RequestLogRecord>>,
    }

    #[async_trait]
    impl RequestLogPort for MemoryLog {
        async fn record(&self, record: &RequestLogRecord) -> Result<(), ApplicationError> {
            self.records.lock().await.push(record.clone());
            Ok(())
        }

        async fn user_stats(&self, _: &UserId, _: u32) -> Result<UserStats, ApplicationError> {
            Ok(UserStats::default())
        }

        async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApplicationError> {
            Ok(AnalyticsSummary::default())
        }
    }

    /// Provider that answers after a delay
    struct SlowWeather {
        delay: Duration,
    }

    #[async_trait]
    impl WeatherPort for SlowWeather {
        async fn fetch_current(
            &self,
            location: &LocationQuery,
        ) -> Result<CurrentConditions, ApplicationError> {
            tokio::time::sleep(self.delay).await;
            Ok(current_for(location.raw()))
        }

        async fn fetch_hourly_forecast(
            &self,
            _: &LocationQuery,
        ) -> Result<Vec<HourlyForecastEntry>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn fetch_daily_forecast(
            &self,
            _: &LocationQuery,
        ) -> Result<Vec<DailyForecastEntry>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn fetch_air_quality(
            &self,
            _: &LocationQuery,
        ) -> Result<AirQuality, ApplicationError> {
            Ok(AirQuality::default())
        }

        async fn fetch_alerts(
            &self,
            _: &LocationQuery,
        ) -> Result<Vec<WeatherAlert>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn fetch_astronomy(
            &self,
            _: &LocationQuery,
            _: NaiveDate,
        ) -> Result<AstronomyData, ApplicationError> {
            Ok(AstronomyData::default())
        }

        async fn search_locations(
            &self,
            _: &str,
        ) -> Result<Vec<LocationMatch>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn fetch_historical(
            &self,
            _: &LocationQuery,
            _: NaiveDate,
        ) -> Result<HistoricalDay, ApplicationError> {
            Ok(HistoricalDay::default())
        }
    }

    fn current_for(location: &str) -> CurrentConditions {
        CurrentConditions {
            location: location.to_string(),
            temperature_c: 18.0,
            humidity: 55,
            condition: "Sunny".to_string(),
            ..Default::default()
        }
    }

    fn user() -> UserId {
        UserId::new("1001")
    }

    fn service_with(
        weather: MockWeatherPort,
        cache: Arc<MemoryCache>,
        log: Arc<MemoryLog>,
    ) -> WeatherService {
        WeatherService::new(Arc::new(weather), cache, log)
    }

    #[tokio::test]
    async fn miss_fetches_stores_and_logs() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .times(1)
            .returning(|q| Ok(current_for(q.raw())));
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, Arc::clone(&cache), Arc::clone(&log));

        let current = service.current(&user(), "Paris, France").await.unwrap();

        assert_eq!(current.location, "Paris, France");
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
        let records = log.records.lock().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].location, "Paris, France");
        assert_eq!(records[0].request_type, WeatherDataType::Current);
        drop(records);

        let entries = cache.entries.lock().await;
        let key = CacheKey::new(&LocationQuery::parse("Paris, France"), WeatherDataType::Current);
        assert_eq!(entries.get(&key).map(|(_, ttl)| *ttl), Some(DEFAULT_CACHE_TTL));
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache_and_still_logged() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .times(1)
            .returning(|q| Ok(current_for(q.raw())));
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, Arc::clone(&cache), Arc::clone(&log));

        let first = service.current(&user(), "Tokyo").await.unwrap();
        let second = service.current(&user(), "tokyo").await.unwrap();

        assert_eq!(first, second);
        let records = log.records.lock().await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.success));
    }

    #[tokio::test]
    async fn provider_failure_is_returned_and_logged_once() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .times(1)
            .returning(|_| Err(ApplicationError::ExternalService("Request timed out after 30 seconds".into())));
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, Arc::clone(&cache), Arc::clone(&log));

        let result = service.current(&user(), "40.7,-74.0").await;

        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
        let records = log.records.lock().await;
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert!(
            records[0]
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains("timed out"))
        );
    }

    #[tokio::test]
    async fn empty_location_is_rejected_without_logging() {
        let weather = MockWeatherPort::new();
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, cache, Arc::clone(&log));

        let result = service.current(&user(), "   ").await;

        assert!(matches!(result, Err(ApplicationError::Domain(_))));
        assert!(log.records.lock().await.is_empty());
    }

    #[tokio::test]
    async fn coordinates_reach_the_provider_parsed() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .withf(|q: &LocationQuery| {
                q.is_coordinates()
                    && q.latitude() == Some(40.7)
                    && q.longitude() == Some(-74.0)
            })
            .times(1)
            .returning(|q| Ok(current_for(q.raw())));
        let service = service_with(
            weather,
            Arc::new(MemoryCache::default()),
            Arc::new(MemoryLog::default()),
        );

        assert!(service.current(&user(), "40.7,-74.0").await.is_ok());
    }

    #[tokio::test]
    async fn alerts_are_never_cached() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_alerts()
            .times(2)
            .returning(|_| Ok(Vec::new()));
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, Arc::clone(&cache), Arc::clone(&log));

        service.alerts(&user(), "Miami").await.unwrap();
        service.alerts(&user(), "Miami").await.unwrap();

        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
        assert_eq!(log.records.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn history_uses_dated_key_and_long_ttl() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_historical()
            .times(2)
            .returning(|_, date| {
                Ok(HistoricalDay {
                    date: Some(date),
                    ..Default::default()
                })
            });
        let cache = Arc::new(MemoryCache::default());
        let service = service_with(weather, Arc::clone(&cache), Arc::new(MemoryLog::default()));

        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        service.historical(&user(), "Oslo", d1).await.unwrap();
        service.historical(&user(), "Oslo", d2).await.unwrap();
        let again = service.historical(&user(), "Oslo", d1).await.unwrap();

        assert_eq!(again.date, Some(d1));
        let entries = cache.entries.lock().await;
        assert_eq!(entries.len(), 2);
        assert!(entries.values().all(|(_, ttl)| *ttl == DEFAULT_HISTORY_TTL));
    }

    #[tokio::test]
    async fn disabled_cache_is_bypassed() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_daily_forecast()
            .times(2)
            .returning(|_| Ok(Vec::new()));
        let cache = Arc::new(MemoryCache::default());
        let service = WeatherService::with_config(
            Arc::new(weather),
            Arc::clone(&cache) as Arc<dyn WeatherCachePort>,
            Arc::new(MemoryLog::default()),
            WeatherServiceConfig {
                cache_enabled: false,
                ..Default::default()
            },
        );

        service.daily_forecast(&user(), "Rome").await.unwrap();
        service.daily_forecast(&user(), "Rome").await.unwrap();
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cache_and_log_failures_do_not_fail_the_request() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_air_quality()
            .returning(|_| Ok(AirQuality::default()));
        let mut cache = MockWeatherCachePort::new();
        cache
            .expect_get_fresh()
            .returning(|_| Err(ApplicationError::Internal("database is locked".into())));
        cache
            .expect_put()
            .returning(|_, _, _| Err(ApplicationError::Internal("disk full".into())));
        let mut log = MockRequestLogPort::new();
        log.expect_record()
            .times(1)
            .returning(|_| Err(ApplicationError::Internal("disk full".into())));

        let service = WeatherService::new(Arc::new(weather), Arc::new(cache), Arc::new(log));
        assert!(service.air_quality(&user(), "Delhi").await.is_ok());
    }

    #[tokio::test]
    async fn search_rejects_blank_text() {
        let service = service_with(
            MockWeatherPort::new(),
            Arc::new(MemoryCache::default()),
            Arc::new(MemoryLog::default()),
        );
        let result = service.search_locations(&user(), "  ").await;
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn full_report_keeps_slots_independent() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .returning(|q| Ok(current_for(q.raw())));
        weather
            .expect_fetch_hourly_forecast()
            .returning(|_| Err(ApplicationError::RateLimited));
        weather
            .expect_fetch_daily_forecast()
            .returning(|_| Ok(vec![DailyForecastEntry::default(); 7]));
        weather
            .expect_fetch_air_quality()
            .returning(|_| Ok(AirQuality::default()));
        let log = Arc::new(MemoryLog::default());
        let service = service_with(weather, Arc::new(MemoryCache::default()), Arc::clone(&log));

        let report = service.full_report(&user(), "Berlin").await.unwrap();

        assert!(report.current.is_ok());
        assert!(matches!(report.hourly, Err(ApplicationError::RateLimited)));
        assert_eq!(report.daily.unwrap().len(), 7);
        assert!(report.air_quality.is_ok());
        assert_eq!(log.records.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn full_report_rejects_empty_location() {
        let service = service_with(
            MockWeatherPort::new(),
            Arc::new(MemoryCache::default()),
            Arc::new(MemoryLog::default()),
        );
        assert!(service.full_report(&user(), "").await.is_err());
    }

    #[tokio::test]
    async fn cancelled_caller_does_not_abort_cache_write() {
        let cache = Arc::new(MemoryCache::default());
        let log = Arc::new(MemoryLog::default());
        let service = WeatherService::new(
            Arc::new(SlowWeather {
                delay: Duration::from_millis(100),
            }),
            Arc::clone(&cache) as Arc<dyn WeatherCachePort>,
            Arc::clone(&log) as Arc<dyn RequestLogPort>,
        );

        let outcome =
            tokio::time::timeout(Duration::from_millis(10), service.current(&user(), "Lima")).await;
        assert!(outcome.is_err(), "caller should have timed out");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
        assert_eq!(log.records.lock().await.len(), 1);
    }
}
