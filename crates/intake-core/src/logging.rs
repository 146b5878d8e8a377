//! File logging for the dialog.
//!
//! The dialog owns the terminal, so log output goes to a daily-rolling file
//! under `$INTAKE_HOME/logs`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, paths};

const LOG_FILE_PREFIX: &str = "intake";

/// Initializes logging under the default logs directory.
/// Returns a guard that must be kept alive for the duration of the dialog.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    init_logging_to_dir(&paths::logs_dir(), &config.effective_filter())
}

/// Initializes logging to a custom directory with a custom filter.
///
/// `filter` is the only source of directives; `RUST_LOG` is not consulted,
/// use `INTAKE_LOG` (see `LoggingConfig::effective_filter`).
///
/// # Errors
/// Returns an error if the filter is invalid, the directory cannot be
/// created or a global subscriber is already installed.
pub fn init_logging_to_dir(logs_dir: &Path, filter: &str) -> Result<WorkerGuard> {
    let env_filter = build_filter(filter)?;

    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

fn build_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter '{filter}'"))
}
