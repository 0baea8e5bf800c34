//! File-backed tracing setup.
//!
//! The TUI owns the terminal, so log output goes to a file through a
//! non-blocking writer. Keep the returned guard alive until exit or the
//! tail of the log is lost.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable that overrides the configured level filter.
pub const LOG_ENV: &str = "SWISS_LOG";

/// Builds the level filter: `SWISS_LOG` wins over the configured directive.
pub fn build_filter(configured: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(configured)
            .with_context(|| format!("Invalid log level directive: {configured}")),
    }
}

/// Installs the global subscriber writing to the configured log file.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    let path = config.file_path();
    init_at(&path, &config.level)
}

fn init_at(path: &Path, level: &str) -> Result<WorkerGuard> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .context("Log path has no file name")?
        .to_owned();

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level)?)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_is_an_error() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        assert!(build_filter("swiss=notalevel").is_err());
    }

    #[test]
    fn test_valid_directive_builds() {
        assert!(build_filter("swiss_tui=debug").is_ok());
    }
}
