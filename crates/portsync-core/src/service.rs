//! Adapter traits implemented by port sources and torrent clients.

use async_trait::async_trait;

use crate::model::{Port, Session};

/// Supplies the port currently forwarded by the VPN gateway.
#[async_trait]
pub trait PortSource: Send + Sync {
    /// Label naming where the port comes from, used in logs and errors.
    fn describe(&self) -> String;

    /// Read the forwarded port. The raw value is returned unvalidated.
    async fn forwarded_port(&self) -> anyhow::Result<i64>;
}

/// Control API of the torrent client whose listening port is reconciled.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Log in and obtain a session for the current cycle.
    async fn authenticate(&self) -> anyhow::Result<Session>;

    /// Read the configured listening port.
    async fn listen_port(&self, session: &Session) -> anyhow::Result<i64>;

    /// Set an explicit listening port, disabling random and UPnP assignment.
    async fn set_listen_port(&self, session: &Session, port: Port) -> anyhow::Result<()>;
}
