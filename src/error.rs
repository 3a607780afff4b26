//! Error types for SeverityRouter
//!
//! This module defines all error types used by the router, its sinks and the
//! configuration layer. Logging operations return these errors instead of
//! swallowing them so a caller that checks can observe a degraded sink.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SeverityRouter operations
#[derive(Error, Debug)]
pub enum RouterError {
    /// Log directory missing, not a directory, or not writable when a file
    /// sink is first constructed
    #[error("Configuration error: log directory {} is unusable: {source}", .path.display())]
    Configuration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write to an attached sink failed
    #[error("Write error on {sink}: {source}")]
    Write {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// I/O errors outside of sink writes (reading config files)
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for SeverityRouter operations
pub type Result<T> = std::result::Result<T, RouterError>;

impl RouterError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new log-directory error
    pub fn directory<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Configuration {
            path: path.into(),
            source,
        }
    }

    /// Create a new write error
    pub fn write<S: Into<String>>(sink: S, source: std::io::Error) -> Self {
        Self::Write {
            sink: sink.into(),
            source,
        }
    }

    /// Check if this error is recoverable
    ///
    /// A failed write may succeed next time (disk space freed, permissions
    /// restored); a bad configuration will not fix itself.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Write { .. } => true,
            Self::IoError { .. } => true,
            Self::Configuration { .. } => false,
            _ => false,
        }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Write { .. } => "write",
            Self::ConfigError(_) | Self::ConfigFileMissing(_) | Self::InvalidLogLevel(_) => {
                "config"
            }
            Self::TomlError { .. } => "toml",
            Self::IoError { .. } => "io",
        }
    }
}
