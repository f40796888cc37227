//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file '{}'", .path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to parse configuration file '{}'", .path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// A field contained an invalid value.
    #[error("invalid value for '{field}' from {origin}: {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Where the value came from (file path or environment variable).
        origin: String,
        /// Offending value when it is safe to echo.
        value: Option<String>,
        /// Human-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
