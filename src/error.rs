//! Crate-level error type.

use crate::validation::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from configuration, logging and the headless runner.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration")]
    ConfigLoad(#[from] confy::ConfyError),

    /// The configuration file could not be written.
    #[error("failed to save configuration")]
    ConfigSave(#[source] confy::ConfyError),

    /// The log file could not be opened.
    #[error("failed to open log file {path}")]
    LogFile {
        /// The log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No platform data directory to put the log file in.
    #[error("no data directory available for the log file")]
    NoLogDir,

    /// A subscriber was already installed for this process.
    #[error("logging is already initialised")]
    LoggingInstalled,

    /// The countdown target was rejected.
    #[error("invalid countdown target: {0}")]
    Validation(#[from] ValidationErrors),

    /// Writing countdown output failed.
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

/// Result with the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
