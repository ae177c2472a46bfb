//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: SQLite-backed cache, request log and
//! preference stores, the weather provider adapter and the text catalog.
//! Also owns configuration loading, tracing setup and scheduled maintenance.

pub mod adapters;
pub mod config;
pub mod i18n;
pub mod persistence;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, LocalizationConfig, TelemetryConfig, WeatherAppConfig,
};
pub use i18n::{CatalogError, TextCatalog};
pub use persistence::{
    ConnectionPool, DatabaseError, SqlitePreferenceStore, SqliteRequestLog, SqliteWeatherCache,
    create_pool,
};
pub use scheduled_tasks::{CACHE_MAINTENANCE_TASK, create_cache_maintenance_task};
pub use scheduler::{MaintenanceScheduler, SchedulerError};
pub use telemetry::{TelemetryError, init_telemetry};
