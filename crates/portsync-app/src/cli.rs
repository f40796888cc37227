//! Command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use portsync_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, TelemetryError};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_INTERVAL_SECS: u64 = 600;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Keep qBittorrent's listening port equal to the VPN forwarded port.
#[derive(Debug, Clone, Parser)]
#[command(name = "portsync", version, about)]
pub struct Cli {
    /// YAML configuration file; missing files fall back to defaults.
    #[arg(
        short = 'f',
        long = "config",
        env = "PORTSYNC_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Read the forwarded port from this file instead of querying Gluetun.
    #[arg(short = 'i', long = "port-file", env = "PORTSYNC_PORT_FILE")]
    pub port_file: Option<PathBuf>,

    /// Run a single reconciliation cycle and exit.
    #[arg(short = 'j', long = "once", alias = "job", env = "PORTSYNC_ONCE")]
    pub once: bool,

    /// Seconds between reconciliation cycles.
    #[arg(
        short = 'u',
        long = "interval",
        env = "PORTSYNC_INTERVAL_SECS",
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Per-request HTTP timeout in seconds.
    #[arg(
        long,
        env = "PORTSYNC_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Log output format (`pretty` or `json`); defaults to pretty in debug builds.
    #[arg(long = "log-format", env = "PORTSYNC_LOG_FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long = "log-level", env = "PORTSYNC_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Cli {
    /// Delay between cycles in continuous mode.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Label for the run mode, recorded on the process span.
    #[must_use]
    pub const fn mode_label(&self) -> &'static str {
        if self.once { "once" } else { "continuous" }
    }
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse()
        .map_err(|err: TelemetryError| err.to_string())
}
