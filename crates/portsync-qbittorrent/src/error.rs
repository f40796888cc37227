//! Error types for the qBittorrent adapter.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the qBittorrent Web API.
#[derive(Debug, Error)]
pub enum QbittorrentError {
    /// The configured origin could not be turned into request URLs.
    #[error("invalid qBittorrent URL '{url}'")]
    InvalidUrl {
        /// URL that failed to parse.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// The request never produced a response (connect, timeout, body read).
    #[error("qBittorrent {operation} request failed")]
    Http {
        /// Operation being performed.
        operation: &'static str,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The Web API answered with a non-success status.
    #[error("qBittorrent {operation} returned status {status}")]
    HttpStatus {
        /// Operation being performed.
        operation: &'static str,
        /// Status returned by the server.
        status: StatusCode,
    },
    /// Login was answered without a session cookie.
    #[error("qBittorrent rejected the credentials (response: '{body}')")]
    LoginRejected {
        /// Trimmed response body, typically `Fails.`.
        body: String,
    },
    /// The preferences payload could not be decoded.
    #[error("failed to decode qBittorrent preferences")]
    Decode {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The preferences update payload could not be encoded.
    #[error("failed to encode qBittorrent preferences update")]
    Encode {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
