/*
[INPUT]:  Outbound reqwest requests
[OUTPUT]: Responses, or timeout/transport errors
[POS]:    HTTP layer - injectable transport capability
[UPDATE]: When adding transport wrappers
*/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use tracing::debug;

use crate::http::{Result, SessionError};

/// Fetch-shaped transport the session core sends every request through.
///
/// Implement this to plug in a different HTTP stack or a test double.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl HttpTransport for Client {
    async fn fetch(&self, request: Request) -> Result<Response> {
        Ok(self.execute(request).await?)
    }
}

/// Aborts each call that takes longer than `timeout`
#[derive(Debug, Clone)]
pub struct TimeoutTransport<T> {
    inner: T,
    timeout: Duration,
}

impl<T> TimeoutTransport<T> {
    pub fn new(inner: T, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for TimeoutTransport<T> {
    async fn fetch(&self, request: Request) -> Result<Response> {
        let url = request.url().clone();
        match tokio::time::timeout(self.timeout, self.inner.fetch(request)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(%url, timeout_ms = self.timeout.as_millis() as u64, "request aborted");
                Err(SessionError::Timeout {
                    duration_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}
