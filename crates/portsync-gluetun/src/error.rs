//! Error types for the Gluetun adapter.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while querying the Gluetun control server.
#[derive(Debug, Error)]
pub enum GluetunError {
    /// The configured origin could not be turned into a request URL.
    #[error("invalid Gluetun URL '{url}'")]
    InvalidUrl {
        /// URL that failed to parse.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// The request never produced a response.
    #[error("Gluetun port forwarding request failed")]
    Http {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The control server answered with a non-success status.
    #[error("Gluetun returned status {status}")]
    HttpStatus {
        /// Status returned by the server.
        status: StatusCode,
    },
    /// The response did not contain an integer `port` field.
    #[error("failed to decode Gluetun port forwarding response")]
    Decode {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
