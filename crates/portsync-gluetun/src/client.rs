//! Forwarded-port lookup against the Gluetun control server.

use async_trait::async_trait;
use portsync_core::PortSource;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::GluetunError;

const PORT_FORWARDED_PATH: &str = "v1/openvpn/portforwarded";

#[derive(Debug, Deserialize)]
struct PortForwarded {
    port: i64,
}

/// Reads the VPN forwarded port from `GET /v1/openvpn/portforwarded`.
#[derive(Debug, Clone)]
pub struct GluetunPortSource {
    http: Client,
    url: Url,
}

impl GluetunPortSource {
    /// Build a source for the control server at `origin` (for example `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns [`GluetunError::InvalidUrl`] if `origin` is not a valid base URL.
    pub fn new(http: Client, origin: &str) -> Result<Self, GluetunError> {
        let origin = origin.trim_end_matches('/');
        let url = Url::parse(&format!("{origin}/"))
            .and_then(|base| base.join(PORT_FORWARDED_PATH))
            .map_err(|source| GluetunError::InvalidUrl {
                url: origin.to_string(),
                source,
            })?;
        Ok(Self { http, url })
    }

    /// Endpoint queried for the forwarded port.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the forwarded port. Zero means Gluetun has no port yet; the
    /// caller decides whether that is valid.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error.
    pub async fn fetch_port(&self) -> Result<i64, GluetunError> {
        debug!(url = %self.url, "querying Gluetun forwarded port");
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| GluetunError::Http { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GluetunError::HttpStatus { status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| GluetunError::Http { source })?;
        let payload: PortForwarded =
            serde_json::from_str(&body).map_err(|source| GluetunError::Decode { source })?;
        Ok(payload.port)
    }
}

#[async_trait]
impl PortSource for GluetunPortSource {
    fn describe(&self) -> String {
        format!("Gluetun at {}", self.url)
    }

    async fn forwarded_port(&self) -> anyhow::Result<i64> {
        Ok(self.fetch_port().await?)
    }
}
