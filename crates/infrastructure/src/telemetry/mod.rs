//! Tracing subscriber setup
//!
//! Console logging to stderr through `tracing-subscriber`, either
//! human-readable or JSON lines. `RUST_LOG` takes precedence over the
//! configured filter.

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryConfig;

/// Error type for telemetry initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive is invalid
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing subscriber: {0}")]
    Init(String),
}

/// Build the filter from `RUST_LOG`, falling back to `log_filter`
///
/// # Errors
///
/// Returns `TelemetryError::Filter` if `RUST_LOG` is unset and `log_filter`
/// does not parse.
pub fn env_filter(log_filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(log_filter).map_err(|e| TelemetryError::Filter {
            filter: log_filter.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber was already
/// installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&config.log_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(json = config.json, "Telemetry initialized");
    Ok(())
}
