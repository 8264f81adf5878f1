//! Minimal cookie handling: read one cookie from the request, build
//! `Set-Cookie` values for the response.
//!
//! Every cookie this service sets is `HttpOnly; SameSite=Lax; Path=/`, plus
//! `Secure` in production.

use std::fmt;

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use taskboard_core::types::Timestamp;

use crate::error::AppError;

/// Return the value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// A `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    expires: Option<Timestamp>,
    max_age_secs: Option<i64>,
    secure: bool,
}

impl SetCookie {
    /// A cookie that lives until `expires`.
    pub fn until(name: &str, value: &str, expires: Timestamp, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires: Some(expires),
            max_age_secs: None,
            secure,
        }
    }

    /// A cookie that lives for `max_age_secs` seconds.
    pub fn for_secs(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires: None,
            max_age_secs: Some(max_age_secs),
            secure,
        }
    }

    /// Tell the browser to drop cookie `name`.
    pub fn removal(name: &str, secure: bool) -> Self {
        Self::for_secs(name, "", 0, secure)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_header_value(&self) -> Result<HeaderValue, AppError> {
        HeaderValue::from_str(&self.to_string())
            .map_err(|e| AppError::InternalError(format!("Invalid Set-Cookie value: {e}")))
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, self.value)?;
        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }
        if let Some(max_age) = self.max_age_secs {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        map
    }

    #[test]
    fn reads_named_cookie_among_others() {
        let map = headers("theme=dark; session=abc123; other=1");
        assert_eq!(read_cookie(&map, "session").as_deref(), Some("abc123"));
        assert_eq!(read_cookie(&map, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_is_absent() {
        assert_eq!(read_cookie(&headers("session="), "session"), None);
    }

    #[test]
    fn prefix_names_do_not_match() {
        assert_eq!(read_cookie(&headers("session_old=x"), "session"), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let expires = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        let cookie = SetCookie::until("session", "tok", expires, false).to_string();
        assert_eq!(
            cookie,
            "session=tok; Path=/; HttpOnly; SameSite=Lax; Expires=Tue, 03 Feb 2026 04:05:06 GMT"
        );
    }

    #[test]
    fn secure_flag_in_production() {
        let cookie = SetCookie::for_secs("google_oauth_state", "s", 600, true).to_string();
        assert!(cookie.ends_with("; Max-Age=600; Secure"));
    }

    #[test]
    fn removal_expires_immediately() {
        let cookie = SetCookie::removal("session", false).to_string();
        assert_eq!(cookie, "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    }
}
