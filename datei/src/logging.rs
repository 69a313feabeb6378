//! Tracing subscriber setup.
//!
//! Installs a global subscriber with:
//! - an `EnvFilter` built from `RUST_LOG`, falling back to the configured level
//! - a compact stderr layer
//! - optionally, a non-blocking file layer under the configured directory

use std::io;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Log file name inside the logging directory.
pub const LOG_FILE_NAME: &str = "datei.log";

/// Errors from logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to create log directory: {0}")]
    Directory(#[from] io::Error),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Build the filter: `RUST_LOG` if set, else `settings.level`.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| LoggingError::InvalidFilter {
            directive: settings.level.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Install the global subscriber.
///
/// Returns the file writer's guard when file logging is enabled; keep it
/// alive for as long as logs should be flushed.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = build_filter(settings)?;
    let stderr_layer = fmt::layer().compact().with_writer(io::stderr);

    let (file_layer, guard) = if settings.file {
        std::fs::create_dir_all(&settings.directory)?;
        let appender = tracing_appender::rolling::never(&settings.directory, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(guard)
}
