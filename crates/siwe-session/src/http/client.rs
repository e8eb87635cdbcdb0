/*
[INPUT]:  HTTP configuration (timeouts, cookie jar)
[OUTPUT]: Configured reqwest client ready for session calls
[POS]:    HTTP layer - default transport construction
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::Jar;

use crate::http::Result;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build a cookie-aware client that replays session cookies on every request.
///
/// Returns the jar as well so a [`CookieJarExtractor`](crate::http::CookieJarExtractor)
/// can read what the login response stored.
pub fn cookie_client(config: &ClientConfig) -> Result<(Client, Arc<Jar>)> {
    let jar = Arc::new(Jar::default());
    let client = Client::builder()
        .cookie_provider(Arc::clone(&jar))
        .connect_timeout(config.connect_timeout)
        .build()?;
    Ok((client, jar))
}
