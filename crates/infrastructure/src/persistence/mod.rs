//! Persistence module
//!
//! SQLite-based storage for the weather cache, the request log, and user
//! preferences.

pub mod connection;
mod error;
pub mod migrations;
mod preference_store;
mod request_log_store;
mod weather_cache_store;

pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use preference_store::SqlitePreferenceStore;
pub use request_log_store::SqliteRequestLog;
pub use weather_cache_store::{DEFAULT_LOG_RETENTION_DAYS, SqliteWeatherCache};
