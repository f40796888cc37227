//! Session cookie extraction from login responses.

use portsync_core::Session;
use reqwest::header::{HeaderMap, SET_COOKIE};

const SESSION_COOKIE: &str = "SID";

/// Find the `SID` cookie among the `Set-Cookie` headers of a login response.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| {
            // Attributes (Path, HttpOnly, ...) follow the first `;`.
            let pair = raw.split(';').next().unwrap_or_default();
            cookie_value(pair, SESSION_COOKIE)
        })
        .map(Session::new)
}

fn cookie_value(pair: &str, needle: &str) -> Option<String> {
    let (name, value) = pair.split_once('=')?;
    if !name.trim().eq_ignore_ascii_case(needle) {
        return None;
    }
    let value = value.trim().trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}
