//! Mock qBittorrent and Gluetun servers built on `httpmock`.

use httpmock::Mock;
use httpmock::prelude::*;
use serde_json::json;

/// Session id handed out by [`QbittorrentMock::accept_login`].
pub const SESSION_ID: &str = "portsync-test-session";
/// User name expected by [`QbittorrentMock::accept_login`].
pub const USERNAME: &str = "admin";
/// Password expected by [`QbittorrentMock::accept_login`].
pub const PASSWORD: &str = "adminadmin";

/// Form body qBittorrent receives when the listening port is set to `port`.
#[must_use]
pub fn set_preferences_body(port: u16) -> String {
    format!(
        "json=%7B%22listen_port%22%3A{port}%2C%22random_port%22%3Afalse%2C%22upnp%22%3Afalse%7D"
    )
}

/// Configuration file contents pointing at both mocks with the expected credentials.
#[must_use]
pub fn config_yaml(qbittorrent: &QbittorrentMock, gluetun: &GluetunMock) -> String {
    format!(
        "qbittorrent_user: {USERNAME}\n\
         qbittorrent_pass: {PASSWORD}\n\
         qbittorrent_server: \"{}\"\n\
         qbittorrent_port: {}\n\
         gluetun_server: \"{}\"\n\
         gluetun_port: {}\n",
        qbittorrent.host(),
        qbittorrent.port(),
        gluetun.host(),
        gluetun.port()
    )
}

/// Mock qBittorrent Web UI.
pub struct QbittorrentMock {
    server: MockServer,
}

impl QbittorrentMock {
    /// Start a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Origin (`http://127.0.0.1:<port>`) of the mock.
    #[must_use]
    pub fn origin(&self) -> String {
        self.server.base_url()
    }

    /// Host the mock listens on.
    #[must_use]
    pub fn host(&self) -> String {
        self.server.host()
    }

    /// Port the mock listens on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Accept [`USERNAME`]/[`PASSWORD`] and hand out [`SESSION_ID`].
    #[must_use]
    pub fn accept_login(&self) -> Mock<'_> {
        let referer = self.origin();
        let body = format!("username={USERNAME}&password={PASSWORD}");
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/api/v2/auth/login")
                .header("referer", referer.as_str())
                .body(body.as_str());
            then.status(200)
                .header("set-cookie", format!("SID={SESSION_ID}; HttpOnly; path=/"))
                .body("Ok.");
        })
    }

    /// Answer every login with qBittorrent's failure body and no cookie.
    #[must_use]
    pub fn reject_login(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST).path("/api/v2/auth/login");
            then.status(200).body("Fails.");
        })
    }

    /// Serve preferences reporting `port` as the listening port.
    #[must_use]
    pub fn serve_listen_port(&self, port: i64) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/app/preferences")
                .header("cookie", format!("SID={SESSION_ID}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "listen_port": port,
                    "random_port": false,
                    "upnp": true
                }));
        })
    }

    /// Accept exactly the update that sets the listening port to `port`.
    #[must_use]
    pub fn expect_update(&self, port: u16) -> Mock<'_> {
        let body = set_preferences_body(port);
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/api/v2/app/setPreferences")
                .header("cookie", format!("SID={SESSION_ID}"))
                .body(body.as_str());
            then.status(200);
        })
    }
}

/// Mock Gluetun control server.
pub struct GluetunMock {
    server: MockServer,
}

impl GluetunMock {
    /// Start a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Host the mock listens on.
    #[must_use]
    pub fn host(&self) -> String {
        self.server.host()
    }

    /// Port the mock listens on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Report `port` as the forwarded port.
    #[must_use]
    pub fn serve_forwarded_port(&self, port: i64) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path("/v1/openvpn/portforwarded");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "port": port }));
        })
    }
}
