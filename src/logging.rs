//! Tracing setup.
//!
//! The terminal belongs to the countdown screen, so log output goes to a
//! file: `<data dir>/countdown/countdown.log` unless another path is given.
//! Headless runs may log to stderr instead.

use crate::config::APP_NAME;
use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file.
    File(PathBuf),
    /// Write to stderr.
    Stderr,
}

/// The default log file path.
pub fn default_log_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME).join(format!("{APP_NAME}.log")))
        .ok_or(Error::NoLogDir)
}

/// Builds the filter: `RUST_LOG` first, then `fallback`, then [`DEFAULT_FILTER`].
pub fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens `path` for appending, creating its directory.
pub fn open_log_file(path: &Path) -> Result<File> {
    let open = || -> std::io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    open().map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Installs the global subscriber.
pub fn init(target: &LogTarget, level: Option<&str>) -> Result<()> {
    let filter = env_filter(level);
    let installed = match target {
        LogTarget::File(path) => {
            let file = Arc::new(open_log_file(path)?);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(file).with_ansi(false))
                .try_init()
        }
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|_| Error::LoggingInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_file_name() {
        if let Ok(path) = default_log_path() {
            assert!(path.ends_with("countdown/countdown.log"));
        }
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = std::env::temp_dir().join(format!("countdown-log-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("countdown.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_reports_path() {
        let dir = std::env::temp_dir().join(format!("countdown-log-dir-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let err = open_log_file(&dir).unwrap_err();
        assert!(matches!(err, Error::LogFile { ref path, .. } if path == &dir));
    }

    #[test]
    fn test_env_filter_uses_fallback() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter(None).to_string(), DEFAULT_FILTER);
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
    }
}
