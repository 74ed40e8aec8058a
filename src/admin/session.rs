//! Session carriers
//!
//! The token travels in the `admin_session` cookie set at login. API clients
//! may send it as `Authorization: Bearer <token>` instead; the header wins when
//! both are present.

use http::{header, HeaderMap, HeaderValue};

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Build the `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string(token, max_age_secs.max(0), secure))
}

/// Build the `Set-Cookie` value expiring the session cookie
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string("", 0, secure))
}

fn cookie_string(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Max-Age={}; Path=/",
        SESSION_COOKIE_NAME, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from the request headers
///
/// Looks at `Authorization: Bearer` first and falls back to the session
/// cookie. Empty values count as absent.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    non_empty(token)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .and_then(|(_, value)| non_empty(value))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
