//! Validation helpers for configuration values.

use crate::error::{ConfigError, ConfigResult};

/// Parse a port supplied as text (environment variables).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the value is not an integer in 1-65535.
pub fn parse_port(raw: &str, field: &'static str, origin: &str) -> ConfigResult<u16> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidField {
            field,
            origin: origin.to_string(),
            value: Some(raw.to_string()),
            reason: "must be an integer",
        })?;
    validate_port(value, field, origin)
}

/// Check that a numeric port lies in 1-65535.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the value is out of range.
pub fn validate_port(value: i64, field: &'static str, origin: &str) -> ConfigResult<u16> {
    u16::try_from(value)
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| ConfigError::InvalidField {
            field,
            origin: origin.to_string(),
            value: Some(value.to_string()),
            reason: "must be between 1 and 65535",
        })
}

/// Check that a host name is not blank and return it trimmed.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the host is empty after trimming.
pub fn validate_host(raw: &str, field: &'static str, origin: &str) -> ConfigResult<String> {
    let host = raw.trim();
    if host.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            origin: origin.to_string(),
            value: None,
            reason: "must not be empty",
        });
    }
    Ok(host.to_string())
}
