//! Typed configuration consumed by the reconciler's adapters.

use std::fmt;

use crate::defaults;

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// qBittorrent Web UI connection and credentials.
    pub qbittorrent: ClientEndpoint,
    /// Gluetun control server connection.
    pub gluetun: GatewayEndpoint,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            qbittorrent: ClientEndpoint {
                host: defaults::QBITTORRENT_HOST.to_string(),
                port: defaults::QBITTORRENT_PORT,
                username: String::new(),
                password: String::new(),
            },
            gluetun: GatewayEndpoint {
                host: defaults::GLUETUN_HOST.to_string(),
                port: defaults::GLUETUN_PORT,
            },
        }
    }
}

/// qBittorrent Web UI endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientEndpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port of the Web UI.
    pub port: u16,
    /// Web UI user name.
    pub username: String,
    /// Web UI password.
    pub password: String,
}

impl ClientEndpoint {
    /// Origin URL (`http://host:port`) without a trailing slash.
    ///
    /// qBittorrent requires this exact value in the `Referer` header.
    #[must_use]
    pub fn origin(&self) -> String {
        origin(&self.host, self.port)
    }
}

impl fmt::Debug for ClientEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Gluetun control server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port of the control server.
    pub port: u16,
}

impl GatewayEndpoint {
    /// Origin URL (`http://host:port`) without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> String {
        origin(&self.host, self.port)
    }
}

fn origin(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{host}]:{port}")
    } else {
        format!("http://{host}:{port}")
    }
}
