//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber once at startup
//! - Pick the filter from `RUST_LOG` or the configured level
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Output goes to stdout, next to the startup diagnostics

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{level}': {reason}")]
    Filter { level: String, reason: String },

    #[error("failed to set subscriber: {0}")]
    Install(String),
}

/// Build the filter.
///
/// With `prefer_configured`, the configured level wins and `RUST_LOG` is
/// ignored. Otherwise `RUST_LOG` wins when set and valid.
pub fn build_filter(
    config: &ObservabilityConfig,
    prefer_configured: bool,
) -> Result<EnvFilter, LoggingError> {
    let configured = || {
        EnvFilter::try_new(&config.log_level).map_err(|e| LoggingError::Filter {
            level: config.log_level.clone(),
            reason: e.to_string(),
        })
    };

    if prefer_configured {
        configured()
    } else {
        EnvFilter::try_from_default_env().or_else(|_| configured())
    }
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig, prefer_configured: bool) -> Result<(), LoggingError> {
    let filter = build_filter(config, prefer_configured)?;

    let installed = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_writer(std::io::stdout)
            .try_init(),
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}
