use axum::http::{HeaderMap, header};
use serde_json::Value;
use std::collections::HashMap;

/// CookieMap
///
/// Cookie name to value, as sent by the browser for a single request.
pub type CookieMap = HashMap<String, String>;

/// RequestDescriptor
///
/// The only view of an inbound request the gateway is allowed to see: the target
/// path and the raw cookie map. Built fresh for every request and dropped once the
/// routing decision has been made.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub path: String,
    pub cookies: CookieMap,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>, cookies: CookieMap) -> Self {
        Self {
            path: path.into(),
            cookies,
        }
    }

    /// from_parts
    ///
    /// Builds a descriptor from an HTTP request's path and headers.
    /// Every `Cookie` header is consulted in order.
    pub fn from_parts(path: &str, headers: &HeaderMap) -> Self {
        let mut cookies = CookieMap::new();
        for value in headers.get_all(header::COOKIE) {
            // Non-ASCII cookie headers carry nothing we can trust.
            let Ok(raw) = value.to_str() else { continue };
            parse_cookie_header(raw, &mut cookies);
        }
        Self::new(path, cookies)
    }
}

/// parse_cookie_header
///
/// Splits a `Cookie` header into name/value pairs. Pairs without `=` are skipped
/// and the first occurrence of a repeated name wins.
pub fn parse_cookie_header(raw: &str, cookies: &mut CookieMap) {
    for pair in raw.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.trim().to_string());
    }
}

/// SessionCookies
///
/// Names of the cookies that carry session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    /// Cookie holding the opaque session token.
    pub token: String,
    /// Cookie holding the serialized user profile (JSON with a `role_id`).
    pub user: String,
}

impl Default for SessionCookies {
    fn default() -> Self {
        Self {
            token: "token".to_string(),
            user: "user".to_string(),
        }
    }
}

/// RoleClaim
///
/// Outcome of decoding the profile cookie. A missing cookie and a malformed one
/// both end up as `Absent`, so an ambiguous session can never look like an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClaim {
    Decoded(i64),
    Absent,
}

impl RoleClaim {
    /// decode
    ///
    /// Best-effort parse of the profile cookie value. Never fails.
    ///
    /// Browsers store the profile percent-encoded (`%7B%22role_id%22%3A4%7D`), so
    /// the value is decoded before parsing. A stray `%` or bytes that are not
    /// UTF-8 once decoded make the claim `Absent`.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return RoleClaim::Absent;
        };
        if has_malformed_escape(raw) {
            tracing::debug!("profile cookie has a malformed percent escape");
            return RoleClaim::Absent;
        }
        let decoded = match urlencoding::decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "profile cookie does not decode to UTF-8");
                return RoleClaim::Absent;
            }
        };
        let profile = match serde_json::from_str::<Value>(&decoded) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!(error = %e, "profile cookie is not valid JSON");
                return RoleClaim::Absent;
            }
        };
        // Only an object with an integer `role_id` counts; other fields are ignored.
        match profile {
            Value::Object(fields) => fields
                .get("role_id")
                .and_then(Value::as_i64)
                .map_or(RoleClaim::Absent, RoleClaim::Decoded),
            _ => RoleClaim::Absent,
        }
    }

    pub fn is(&self, role_id: i64) -> bool {
        matches!(self, RoleClaim::Decoded(id) if *id == role_id)
    }
}

// `urlencoding::decode` passes escapes like `%ZZ` through untouched; those are
// rejected here instead.
fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// SessionClaim
///
/// Token presence and role derived from the request cookies. The token is taken
/// at face value: signature and expiry checks belong to whoever issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaim {
    pub token: Option<String>,
    pub role: RoleClaim,
}

impl SessionClaim {
    pub fn from_cookies(cookies: &CookieMap, names: &SessionCookies) -> Self {
        let token = cookies
            .get(&names.token)
            .filter(|value| !value.is_empty())
            .cloned();
        let role = RoleClaim::decode(cookies.get(&names.user).map(String::as_str));
        Self { token, role }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}
