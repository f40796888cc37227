//! HTTP client for the qBittorrent Web API (v2).

use std::fmt;

use async_trait::async_trait;
use portsync_core::{Port, Session, TorrentClient};
use reqwest::header::{COOKIE, REFERER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::QbittorrentError;
use crate::session::session_from_headers;

const LOGIN_PATH: &str = "api/v2/auth/login";
const PREFERENCES_PATH: &str = "api/v2/app/preferences";
const SET_PREFERENCES_PATH: &str = "api/v2/app/setPreferences";

/// Web UI credentials. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Bundle a user name and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PreferencesForm {
    json: String,
}

#[derive(Debug, Deserialize)]
struct Preferences {
    listen_port: i64,
}

#[derive(Debug, Serialize)]
struct ListenPortUpdate {
    listen_port: u16,
    random_port: bool,
    upnp: bool,
}

/// qBittorrent Web API client.
///
/// Every request carries a `Referer` equal to the origin; qBittorrent's CSRF
/// protection rejects requests without it.
#[derive(Debug, Clone)]
pub struct QbittorrentClient {
    http: Client,
    origin: String,
    login_url: Url,
    preferences_url: Url,
    set_preferences_url: Url,
    credentials: Credentials,
}

impl QbittorrentClient {
    /// Build a client for the Web UI at `origin` (for example `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns [`QbittorrentError::InvalidUrl`] if `origin` is not a valid base URL.
    pub fn new(
        http: Client,
        origin: &str,
        credentials: Credentials,
    ) -> Result<Self, QbittorrentError> {
        let origin = origin.trim_end_matches('/').to_string();
        let invalid = |source| QbittorrentError::InvalidUrl {
            url: origin.clone(),
            source,
        };
        let base = Url::parse(&format!("{origin}/")).map_err(invalid)?;

        Ok(Self {
            login_url: base.join(LOGIN_PATH).map_err(invalid)?,
            preferences_url: base.join(PREFERENCES_PATH).map_err(invalid)?,
            set_preferences_url: base.join(SET_PREFERENCES_PATH).map_err(invalid)?,
            http,
            origin,
            credentials,
        })
    }

    /// Origin used for requests and the `Referer` header.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Log in and return the `SID` session.
    ///
    /// # Errors
    ///
    /// Returns [`QbittorrentError::LoginRejected`] when the server answers
    /// without a session cookie, or a transport/status error.
    pub async fn login(&self) -> Result<Session, QbittorrentError> {
        const OPERATION: &str = "login";
        debug!(url = %self.login_url, "logging in to qBittorrent");

        let response = self
            .with_referer(self.http.post(self.login_url.clone()))
            .form(&LoginForm {
                username: &self.credentials.username,
                password: &self.credentials.password,
            })
            .send()
            .await
            .map_err(|source| QbittorrentError::Http {
                operation: OPERATION,
                source,
            })?;
        let response = ensure_ok(response, OPERATION)?;

        if let Some(session) = session_from_headers(response.headers()) {
            return Ok(session);
        }
        let body = response
            .text()
            .await
            .map_err(|source| QbittorrentError::Http {
                operation: OPERATION,
                source,
            })?;
        Err(QbittorrentError::LoginRejected {
            body: body.trim().to_string(),
        })
    }

    /// Read the configured listening port from the application preferences.
    ///
    /// # Errors
    ///
    /// Returns a transport/status error, or [`QbittorrentError::Decode`] when
    /// the payload lacks an integer `listen_port`.
    pub async fn current_listen_port(&self, session: &Session) -> Result<i64, QbittorrentError> {
        const OPERATION: &str = "preferences";
        debug!(url = %self.preferences_url, "fetching qBittorrent preferences");

        let response = self
            .authorized(self.http.get(self.preferences_url.clone()), session)
            .send()
            .await
            .map_err(|source| QbittorrentError::Http {
                operation: OPERATION,
                source,
            })?;
        let body = ensure_ok(response, OPERATION)?
            .text()
            .await
            .map_err(|source| QbittorrentError::Http {
                operation: OPERATION,
                source,
            })?;

        let preferences: Preferences =
            serde_json::from_str(&body).map_err(|source| QbittorrentError::Decode { source })?;
        Ok(preferences.listen_port)
    }

    /// Set the listening port, disabling random port selection and `UPnP` so
    /// the value sticks.
    ///
    /// # Errors
    ///
    /// Returns a transport/status error.
    pub async fn update_listen_port(
        &self,
        session: &Session,
        port: Port,
    ) -> Result<(), QbittorrentError> {
        const OPERATION: &str = "setPreferences";
        let json = serde_json::to_string(&ListenPortUpdate {
            listen_port: port.get(),
            random_port: false,
            upnp: false,
        })
        .map_err(|source| QbittorrentError::Encode { source })?;
        debug!(url = %self.set_preferences_url, %port, "updating qBittorrent listen port");

        let response = self
            .authorized(self.http.post(self.set_preferences_url.clone()), session)
            .form(&PreferencesForm { json })
            .send()
            .await
            .map_err(|source| QbittorrentError::Http {
                operation: OPERATION,
                source,
            })?;
        ensure_ok(response, OPERATION)?;
        Ok(())
    }

    fn with_referer(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(REFERER, self.origin.as_str())
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        self.with_referer(builder)
            .header(COOKIE, session.cookie_header())
    }
}

/// qBittorrent answers every successful Web API call with 200; anything else is a failure.
fn ensure_ok(response: Response, operation: &'static str) -> Result<Response, QbittorrentError> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(response)
    } else {
        Err(QbittorrentError::HttpStatus { operation, status })
    }
}

#[async_trait]
impl TorrentClient for QbittorrentClient {
    async fn authenticate(&self) -> anyhow::Result<Session> {
        Ok(self.login().await?)
    }

    async fn listen_port(&self, session: &Session) -> anyhow::Result<i64> {
        Ok(self.current_listen_port(session).await?)
    }

    async fn set_listen_port(&self, session: &Session, port: Port) -> anyhow::Result<()> {
        Ok(self.update_listen_port(session, port).await?)
    }
}
