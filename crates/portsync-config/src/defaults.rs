//! Default endpoints used when neither the config file nor the environment
//! supplies a value.

/// Default qBittorrent Web UI host.
pub const QBITTORRENT_HOST: &str = "localhost";
/// Default qBittorrent Web UI port.
pub const QBITTORRENT_PORT: u16 = 8080;
/// Default Gluetun control server host.
pub const GLUETUN_HOST: &str = "localhost";
/// Default Gluetun control server port.
pub const GLUETUN_PORT: u16 = 8000;
