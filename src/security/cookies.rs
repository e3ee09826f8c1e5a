// ABOUTME: Session cookie parsing and Set-Cookie construction
// ABOUTME: Cookies are HttpOnly, SameSite=Lax, path-wide and Secure in production
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use http::header::COOKIE;
use http::{HeaderMap, HeaderValue};
use panel_core::errors::{AppError, AppResult};

use crate::constants::session::COOKIE_NAME;

/// Extract a cookie value by name from every `Cookie` header on the request
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Session token carried by the request, if any
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    get_cookie_value(headers, COOKIE_NAME)
}

/// `Set-Cookie` value installing a session token
///
/// # Errors
///
/// Returns an error if the token contains bytes not allowed in a header
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> AppResult<HeaderValue> {
    let mut cookie =
        format!("{COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")).with_source(e))
}

/// `Set-Cookie` value expiring the session cookie
#[must_use]
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("panel_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("panel_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; panel_session=abc.def ; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));
        assert_eq!(get_cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("panel_session=tok"));
        assert_eq!(session_token(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("panel_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 3600, false).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("panel_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("tok", 3600, true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie() {
        let cookie = clear_session_cookie(true);
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("{COOKIE_NAME}=;")));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Secure"));
    }
}
