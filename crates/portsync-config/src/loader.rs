//! Settings loader: defaults, then the optional YAML file, then environment overrides.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::Settings;
use crate::validate::{parse_port, validate_host, validate_port};

/// Environment variable overriding the qBittorrent user name.
pub const ENV_QBITTORRENT_USER: &str = "QBITTORRENT_USER";
/// Environment variable overriding the qBittorrent password.
pub const ENV_QBITTORRENT_PASS: &str = "QBITTORRENT_PASS";
/// Environment variable overriding the qBittorrent host.
pub const ENV_QBITTORRENT_SERVER: &str = "QBITTORRENT_SERVER";
/// Environment variable overriding the qBittorrent port.
pub const ENV_QBITTORRENT_PORT: &str = "QBITTORRENT_PORT";
/// Environment variable overriding the Gluetun host.
pub const ENV_GLUETUN_SERVER: &str = "GLUETUN_SERVER";
/// Environment variable overriding the Gluetun port.
pub const ENV_GLUETUN_PORT: &str = "GLUETUN_PORT";

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    qbittorrent_user: Option<String>,
    qbittorrent_pass: Option<String>,
    qbittorrent_server: Option<String>,
    qbittorrent_port: Option<i64>,
    gluetun_server: Option<String>,
    gluetun_port: Option<i64>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
}

/// Load settings from `path` and the process environment.
///
/// A missing file is not an error: defaults and environment values apply.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if any
/// resulting value fails validation.
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, resolving environment overrides through `env`.
///
/// A variable that is present overrides the file even when it is empty.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if any
/// resulting value fails validation.
pub fn load_settings_with<F>(path: &Path, env: F) -> ConfigResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Some(file) = read_file(path)? {
        apply_file(&mut settings, file, path)?;
    } else {
        debug!(path = %path.display(), "configuration file not found; using defaults");
    }

    apply_env(&mut settings, &env)?;
    Ok(settings)
}

fn read_file(path: &Path) -> ConfigResult<Option<FileSettings>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Some(FileSettings::default()));
    }

    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn apply_file(settings: &mut Settings, file: FileSettings, path: &Path) -> ConfigResult<()> {
    let origin = format!("configuration file '{}'", path.display());

    for key in file.unknown.keys() {
        warn!(key = %key, path = %path.display(), "ignoring unknown configuration key");
    }

    if let Some(user) = file.qbittorrent_user {
        settings.qbittorrent.username = user;
    }
    if let Some(pass) = file.qbittorrent_pass {
        settings.qbittorrent.password = pass;
    }
    if let Some(host) = file.qbittorrent_server {
        settings.qbittorrent.host = validate_host(&host, "qbittorrent_server", &origin)?;
    }
    if let Some(port) = file.qbittorrent_port {
        settings.qbittorrent.port = validate_port(port, "qbittorrent_port", &origin)?;
    }
    if let Some(host) = file.gluetun_server {
        settings.gluetun.host = validate_host(&host, "gluetun_server", &origin)?;
    }
    if let Some(port) = file.gluetun_port {
        settings.gluetun.port = validate_port(port, "gluetun_port", &origin)?;
    }
    Ok(())
}

fn apply_env<F>(settings: &mut Settings, env: &F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let origin = |name: &str| format!("environment variable {name}");

    if let Some(user) = env(ENV_QBITTORRENT_USER) {
        settings.qbittorrent.username = user;
    }
    if let Some(pass) = env(ENV_QBITTORRENT_PASS) {
        settings.qbittorrent.password = pass;
    }
    if let Some(host) = env(ENV_QBITTORRENT_SERVER) {
        settings.qbittorrent.host =
            validate_host(&host, "qbittorrent_server", &origin(ENV_QBITTORRENT_SERVER))?;
    }
    if let Some(port) = env(ENV_QBITTORRENT_PORT) {
        settings.qbittorrent.port =
            parse_port(&port, "qbittorrent_port", &origin(ENV_QBITTORRENT_PORT))?;
    }
    if let Some(host) = env(ENV_GLUETUN_SERVER) {
        settings.gluetun.host =
            validate_host(&host, "gluetun_server", &origin(ENV_GLUETUN_SERVER))?;
    }
    if let Some(port) = env(ENV_GLUETUN_PORT) {
        settings.gluetun.port = parse_port(&port, "gluetun_port", &origin(ENV_GLUETUN_PORT))?;
    }
    Ok(())
}
