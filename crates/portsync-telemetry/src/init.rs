//! Subscriber installation and log format selection.
//!
//! # Design
//! - `RUST_LOG` wins when it parses; otherwise the configured default filter applies.
//! - A default filter that does not parse is a startup error, not a silent fallback.

use std::env;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Default filter when neither `RUST_LOG` nor `--log-level` is provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build identifier baked in at compile time through `PORTSYNC_BUILD_SHA`.
pub const BUILD_SHA: &str = match option_env!("PORTSYNC_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Install the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the default filter does not
/// parse, or [`TelemetryError::SubscriberInstall`] when a global subscriber is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = resolve_filter(&config.default_filter, env::var("RUST_LOG").ok().as_deref())?;
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false).with_current_span(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Pick the active filter: a parseable `rust_log` first, then `default_filter`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `default_filter` is needed
/// and does not parse.
pub fn resolve_filter(default_filter: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.map(str::trim).filter(|value| !value.is_empty())
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter).map_err(|source| TelemetryError::InvalidFilter {
        value: default_filter.to_string(),
        source,
    })
}

/// How the process logs: the fallback filter and the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is unset or unparseable.
    pub default_filter: String,
    /// Output format for the fmt layer.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Combine a `--log-level` value with an optional `--log-format` choice.
    #[must_use]
    pub fn new(default_filter: impl Into<String>, format: Option<LogFormat>) -> Self {
        Self {
            default_filter: default_filter.into(),
            format: format.unwrap_or_else(LogFormat::infer),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LEVEL, None)
    }
}

/// Output formats for the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for container log collectors.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(TelemetryError::UnknownLogFormat {
                value: other.to_string(),
            }),
        }
    }
}
