//! services/api/src/web/cookie.rs
//!
//! Building and reading the `token` session cookie.

use axum::http::{header, HeaderMap};

use crate::auth::SESSION_TTL_SECS;

pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a session token. `Secure` only in production.
pub fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        if secure { " Secure;" } else { "" },
        SESSION_TTL_SECS
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE,
        if secure { " Secure;" } else { "" }
    )
}

/// Finds the session token among all `Cookie` headers of a request.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
        .filter(|token| !token.is_empty())
}
