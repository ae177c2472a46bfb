//! Factory functions for scheduled maintenance tasks

use std::sync::Arc;

use application::ports::WeatherCachePort;
use chrono::Utc;
use futures::future::BoxFuture;
use tracing::{debug, error, info};

/// Task name for cache and request-log eviction
pub const CACHE_MAINTENANCE_TASK: &str = "cache_maintenance";

/// Create a cache maintenance task closure
///
/// Each run evicts cache entries that expired before the run started, along
/// with request-log rows past the store's retention window.
pub fn create_cache_maintenance_task(
    cache: Arc<dyn WeatherCachePort>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let cache = Arc::clone(&cache);

        Box::pin(async move {
            debug!("Running cache maintenance");

            match cache.evict_expired(Utc::now()).await {
                Ok(report) => {
                    info!(
                        cache_entries = report.cache_entries,
                        request_logs = report.request_logs,
                        "Cache maintenance completed"
                    );
                    Ok(())
                },
                Err(e) => {
                    error!(error = %e, "Cache maintenance failed");
                    Err(format!("Cache maintenance failed: {e}"))
                },
            }
        })
    }
}
