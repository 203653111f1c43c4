//! Logging setup.
//!
//! Installs a `tracing` subscriber writing human-readable lines to stderr
//! and, when configured, to a log file. The filter is taken from `RUST_LOG`
//! if set, otherwise from the configured level.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// The log file directory could not be created.
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file path has no file name.
    #[error("Invalid log file path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the event filter: `RUST_LOG` wins over `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        filter: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// `verbose` raises the configured level to `debug`. The returned guard
/// flushes the log file when dropped and must be held until exit.
pub fn init(
    settings: &LoggingSettings,
    verbose: bool,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let level = if verbose { "debug" } else { settings.level.as_str() };
    let filter = build_filter(level)?;

    let (file_layer, guard) = match settings.file.as_deref() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::CreateDirectory {
        path: directory.clone(),
        source,
    })?;

    Ok(tracing_appender::rolling::never(directory, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_appender_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs").join("nested");
        file_appender(&dir.join("mcmapper.log")).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warn,mcmapper::audit=debug").is_ok());
        assert!(matches!(
            build_filter("mcmapper=loud"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_file_appender_rejects_directory_path() {
        let result = file_appender(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }
}
