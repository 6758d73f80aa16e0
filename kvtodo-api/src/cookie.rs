//! Session cookie helpers
//!
//! Reads the session token out of `Cookie` request headers and builds the
//! `Set-Cookie` values used by login (issue) and logout (clear).

use crate::config::SessionSettings;
use crate::error::ApiError;
use axum::http::{header, HeaderMap, HeaderValue};

/// Finds the value of cookie `name` across all `Cookie` headers
///
/// Returns `None` when the cookie is absent. An empty value is returned as
/// `Some("")`; the authorization gate rejects it.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// `Set-Cookie` value that hands `token` to the client
pub fn issue_cookie(settings: &SessionSettings, token: &str) -> Result<HeaderValue, ApiError> {
    build(settings, token, settings.ttl_secs)
}

/// `Set-Cookie` value that makes the client drop its session cookie
pub fn clear_cookie(settings: &SessionSettings) -> Result<HeaderValue, ApiError> {
    build(settings, "", 0)
}

fn build(settings: &SessionSettings, value: &str, max_age: u64) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        settings.cookie_name, value, max_age
    );
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid Set-Cookie value: {}", e)))
}
