//! # Design
//!
//! - Centralize application-level errors for bootstrap and the run loop.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Map each failure class onto a process exit code.

use std::error::Error as _;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Exit code for configuration and startup failures.
pub const EXIT_STARTUP: i32 = 2;
/// Exit code for a failed single-shot reconciliation.
pub const EXIT_SYNC_FAILED: i32 = 3;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: portsync_config::ConfigError,
    },
    /// Telemetry setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: portsync_telemetry::TelemetryError,
    },
    /// The shared HTTP client could not be built.
    #[error("http client construction failed")]
    HttpClient {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The qBittorrent adapter could not be constructed.
    #[error("qBittorrent client setup failed")]
    Qbittorrent {
        /// Source adapter error.
        source: portsync_qbittorrent::QbittorrentError,
    },
    /// The Gluetun adapter could not be constructed.
    #[error("Gluetun client setup failed")]
    Gluetun {
        /// Source adapter error.
        source: portsync_gluetun::GluetunError,
    },
    /// A single-shot reconciliation cycle failed.
    #[error("port reconciliation failed")]
    Sync {
        /// Source cycle error.
        source: portsync_core::SyncError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: portsync_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: portsync_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Sync { .. } => EXIT_SYNC_FAILED,
            Self::Config { .. }
            | Self::Telemetry { .. }
            | Self::HttpClient { .. }
            | Self::Qbittorrent { .. }
            | Self::Gluetun { .. } => EXIT_STARTUP,
        }
    }

    /// Message including every cause in the chain, joined by `": "`.
    #[must_use]
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
