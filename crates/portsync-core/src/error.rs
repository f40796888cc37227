//! # Design
//!
//! - One variant per reconciliation stage so callers can tell where a cycle stopped.
//! - Adapter failures are preserved as boxed sources rather than flattened into strings.
//! - `report` renders the full cause chain for single-line logging.

use std::error::Error;

use thiserror::Error;

use crate::model::Port;

/// Boxed adapter error stored as the source of a [`SyncError`].
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors raised while running a reconciliation cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Logging in to the torrent client failed or was rejected.
    #[error("unable to log in to qBittorrent")]
    Auth {
        /// Underlying adapter failure.
        #[source]
        source: BoxError,
    },
    /// The forwarded port could not be obtained from the port source.
    #[error("unable to find forwarded port via {source_label}")]
    PortSource {
        /// Description of the port source that failed.
        source_label: String,
        /// Underlying port source failure.
        #[source]
        source: BoxError,
    },
    /// The port source reported a value outside 1-65535.
    #[error("invalid port number found for forwarded port: {value}")]
    InvalidPort {
        /// Raw value returned by the port source.
        value: i64,
    },
    /// Reading the client's current listening port failed.
    #[error("unable to find listening port in qBittorrent")]
    ListenPortQuery {
        /// Underlying adapter failure.
        #[source]
        source: BoxError,
    },
    /// Writing the new listening port failed.
    #[error("port update to {port} failed")]
    ListenPortUpdate {
        /// Port the update attempted to apply.
        port: Port,
        /// Underlying adapter failure.
        #[source]
        source: BoxError,
    },
}

/// Convenience alias for reconciliation results.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Short machine-readable stage identifier, used as a structured log field.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "login",
            Self::PortSource { .. } => "forwarded_port",
            Self::InvalidPort { .. } => "validate",
            Self::ListenPortQuery { .. } => "listen_port",
            Self::ListenPortUpdate { .. } => "update",
        }
    }

    /// Render the error and every source in its chain as `outer: inner: root`.
    #[must_use]
    pub fn report(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            cause = err.source();
        }
        rendered
    }
}
