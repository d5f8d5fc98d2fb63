//! Process-wide log setup for hosts embedding the engine.
//!
//! The library itself only emits `log` records and `tracing` spans; this
//! installs a subscriber for both.

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Environment variable holding the filter directives.
pub const LOG_FILTER_ENV: &str = "JOBTRAIL_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),

    #[error("Failed to bridge log records: {0}")]
    LogBridge(String),
}

/// Installs the global subscriber, filtered by `JOBTRAIL_LOG` (default
/// `info`), and routes `log` macros through it.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), LoggingError> {
    let filter = std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let env_filter = EnvFilter::try_new(&filter).map_err(|e| LoggingError::InvalidFilter {
        filter: filter.clone(),
        reason: e.to_string(),
    })?;

    let layer = fmt::layer()
        .with_thread_names(true)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(layer.with_filter(env_filter));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    tracing_log::LogTracer::init().map_err(|e| LoggingError::LogBridge(e.to_string()))?;

    Ok(())
}
