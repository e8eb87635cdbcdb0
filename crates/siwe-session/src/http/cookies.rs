/*
[INPUT]:  Login response headers or a shared cookie store
[OUTPUT]: Normalized cookie name/value map
[POS]:    HTTP layer - per-runtime session cookie extraction strategies
[UPDATE]: When adding a cookie source or changing attribute handling
*/

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, SET_COOKIE};
use url::Url;

use crate::http::{Result, SessionError};
use crate::types::CookieMap;

const COOKIE_ATTRIBUTES: [&str; 8] = [
    "path",
    "domain",
    "expires",
    "max-age",
    "secure",
    "httponly",
    "samesite",
    "partitioned",
];

/// Turns a successful login response into the session's cookie map.
///
/// One implementation is picked per runtime when the session manager is
/// built; the returned map replaces the previous one wholesale.
#[async_trait]
pub trait CookieExtractor: Send + Sync {
    async fn extract_cookies(&self, headers: &HeaderMap, url: &Url) -> Result<CookieMap>;
}

/// Treats `set-cookie` as one `;`-delimited string and keeps every
/// `name=value` segment that is not a cookie attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetCookieHeaderExtractor;

#[async_trait]
impl CookieExtractor for SetCookieHeaderExtractor {
    async fn extract_cookies(&self, headers: &HeaderMap, _url: &Url) -> Result<CookieMap> {
        let mut cookies = CookieMap::new();
        for value in headers.get_all(SET_COOKIE) {
            let value = header_str(value)?;
            for segment in value.split(';') {
                if let Some((name, value)) = parse_pair(segment) {
                    if !is_attribute(&name) {
                        cookies.insert(name, value);
                    }
                }
            }
        }
        Ok(cookies)
    }
}

/// One cookie per `set-cookie` header; attributes after the first `;` are
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetCookieListExtractor;

#[async_trait]
impl CookieExtractor for SetCookieListExtractor {
    async fn extract_cookies(&self, headers: &HeaderMap, _url: &Url) -> Result<CookieMap> {
        let mut cookies = CookieMap::new();
        for value in headers.get_all(SET_COOKIE) {
            let value = header_str(value)?;
            let first = value.split(';').next().unwrap_or_default();
            if let Some((name, value)) = parse_pair(first) {
                cookies.insert(name, value);
            }
        }
        Ok(cookies)
    }
}

/// Ignores headers and asks the cookie store that the transport writes into.
#[derive(Debug, Clone)]
pub struct CookieJarExtractor {
    jar: Arc<Jar>,
}

impl CookieJarExtractor {
    pub fn new(jar: Arc<Jar>) -> Self {
        Self { jar }
    }
}

#[async_trait]
impl CookieExtractor for CookieJarExtractor {
    async fn extract_cookies(&self, _headers: &HeaderMap, url: &Url) -> Result<CookieMap> {
        let Some(value) = self.jar.cookies(url) else {
            return Ok(CookieMap::new());
        };
        let value = header_str(&value)?;
        Ok(value.split(';').filter_map(parse_pair).collect())
    }
}

/// Serialize a cookie map as a `cookie` request header value
pub fn cookie_header_value(cookies: &CookieMap) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn header_str(value: &reqwest::header::HeaderValue) -> Result<&str> {
    value
        .to_str()
        .map_err(|e| SessionError::InvalidResponse(format!("Non-ASCII cookie header: {e}")))
}

fn parse_pair(segment: &str) -> Option<(String, String)> {
    let (name, value) = segment.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

fn is_attribute(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    COOKIE_ATTRIBUTES.contains(&name.as_str())
}
