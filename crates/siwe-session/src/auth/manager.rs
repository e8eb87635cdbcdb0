/*
[INPUT]:  Session configuration, signing capability, transport
[OUTPUT]: Live sessions, session cookies, authenticated responses
[POS]:    Auth layer - orchestrates login, clock sync and authenticated fetch
[UPDATE]: When login flow, session tracking or fetch behavior changes
*/

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Request, Response};
use tracing::{debug, info, warn};

use crate::http::{
    ClientConfig, Clock, ClockSynchronizer, CookieExtractor, HttpTransport, Result,
    SessionError, SetCookieListExtractor, SystemClock, TimeoutTransport, cookie_client,
    cookie_header_value,
};
use crate::types::{ClockDiff, CookieMap, LoginParams, LoginRequest, SessionConfig};

use super::{LoginMessageBuilder, MessageSigner, SessionState};

/// Keeps one signed-in session alive for one account.
///
/// Two concurrent [`fetch`](Self::fetch) calls that both find the session
/// expired will each log in; callers that need a single in-flight login must
/// serialize around this type.
pub struct SessionManager {
    config: SessionConfig,
    signer: Arc<dyn MessageSigner>,
    transport: Arc<dyn HttpTransport>,
    cookie_extractor: Arc<dyn CookieExtractor>,
    clock: Arc<dyn Clock>,
    synchronizer: ClockSynchronizer,
    message_builder: LoginMessageBuilder,
    state: SessionState,
    cookies: RwLock<CookieMap>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("address", &self.message_builder.address())
            .field("login_url", &self.config.login_url.as_str())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager with the default cookie-aware transport
    pub fn new(config: SessionConfig, signer: Arc<dyn MessageSigner>) -> Result<Self> {
        Self::builder(config, signer).build()
    }

    pub fn builder(config: SessionConfig, signer: Arc<dyn MessageSigner>) -> SessionManagerBuilder {
        SessionManagerBuilder {
            config,
            signer,
            transport: None,
            cookie_extractor: None,
            clock: None,
        }
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Log in and start a new session.
    ///
    /// Issued-at resolution: explicit parameter, then approximate server time,
    /// then local time if the clock endpoint cannot be used.
    pub async fn login(&self, params: LoginParams) -> Result<()> {
        let issued_at = match params.issued_at {
            Some(issued_at) => issued_at,
            None => self.resolve_issued_at().await,
        };

        let message = self.message_builder.build(issued_at);
        let signed = self
            .message_builder
            .sign(&message, self.signer.as_ref())
            .await?;

        let body = LoginRequest {
            message: signed.message,
            signature: signed.signature,
        };
        let mut request = Request::new(Method::POST, self.config.login_url.clone());
        *request.headers_mut() = self.login_headers(&params.headers);
        *request.body_mut() = Some(serde_json::to_vec(&body)?.into());

        debug!(
            url = %self.config.login_url,
            issued_at = %issued_at,
            nonce = %message.nonce,
            "sending login request"
        );
        let response = self.transport.fetch(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(SessionError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let cookies = self
            .cookie_extractor
            .extract_cookies(response.headers(), &self.config.login_url)
            .await?;
        *self.cookies.write().unwrap_or_else(|e| e.into_inner()) = cookies;
        self.state.set_expiry(signed.expiration_time);

        info!(
            address = %self.message_builder.address(),
            expires_at = %signed.expiration_time,
            "session established"
        );
        Ok(())
    }

    /// True while the last login's expiry lies in the future
    pub fn is_logged_in(&self) -> bool {
        self.state.is_live(self.clock.now())
    }

    /// Send `request` through the transport, logging in first if needed.
    ///
    /// The request is forwarded unmodified; session cookies travel through a
    /// cookie-aware transport or must be attached by the caller via
    /// [`cookie_header`](Self::cookie_header).
    pub async fn fetch(&self, request: Request) -> Result<Response> {
        if !self.is_logged_in() {
            debug!(url = %request.url(), "session not live, logging in before request");
            self.login(LoginParams::default()).await?;
        }
        self.transport.fetch(request).await
    }

    /// Cookies set by the most recent successful login
    pub fn get_cookies(&self) -> CookieMap {
        self.cookies.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Session cookies serialized as a `cookie` header value
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.read().unwrap_or_else(|e| e.into_inner());
        if cookies.is_empty() {
            None
        } else {
            Some(cookie_header_value(&cookies))
        }
    }

    /// Expiry of the last successful login, live or not
    pub fn session_expiry(&self) -> Option<DateTime<Utc>> {
        self.state.expiry()
    }

    pub async fn get_clock_diff_approx(&self) -> Result<ClockDiff> {
        self.synchronizer.get_clock_diff_approx().await
    }

    pub async fn get_server_time_approx(&self) -> Result<DateTime<Utc>> {
        self.synchronizer.get_server_time_approx().await
    }

    async fn resolve_issued_at(&self) -> DateTime<Utc> {
        match self.synchronizer.get_server_time_approx().await {
            Ok(server_time) => server_time,
            Err(err) => {
                warn!(
                    error = %err,
                    "unable to determine issued-at from server clock, using local time"
                );
                self.clock.now()
            }
        }
    }

    fn login_headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for name in self.config.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &self.config.headers {
            headers.append(name.clone(), value.clone());
        }
        for name in overrides.keys() {
            headers.remove(name);
        }
        for (name, value) in overrides {
            headers.append(name.clone(), value.clone());
        }
        headers
    }
}

/// Selects the transport, cookie strategy and clock for a [`SessionManager`]
pub struct SessionManagerBuilder {
    config: SessionConfig,
    signer: Arc<dyn MessageSigner>,
    transport: Option<Arc<dyn HttpTransport>>,
    cookie_extractor: Option<Arc<dyn CookieExtractor>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SessionManagerBuilder {
    /// Use a caller-supplied transport; the configured timeout is not applied
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cookie_extractor(mut self, cookie_extractor: Arc<dyn CookieExtractor>) -> Self {
        self.cookie_extractor = Some(cookie_extractor);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<SessionManager> {
        let message_builder = LoginMessageBuilder::new(&self.config)?;

        let transport: Arc<dyn HttpTransport> = match (self.transport, self.config.timeout) {
            (Some(transport), _) => transport,
            (None, Some(timeout)) => {
                let (client, _jar) = cookie_client(&ClientConfig::default())?;
                Arc::new(TimeoutTransport::new(client, timeout))
            }
            (None, None) => Arc::new(cookie_client(&ClientConfig::default())?.0),
        };
        let cookie_extractor = self
            .cookie_extractor
            .unwrap_or_else(|| Arc::new(SetCookieListExtractor));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let synchronizer = ClockSynchronizer::new(
            Arc::clone(&transport),
            Arc::clone(&clock),
            self.config.clock_url.clone(),
            self.config.headers.clone(),
        );

        Ok(SessionManager {
            config: self.config,
            signer: self.signer,
            transport,
            cookie_extractor,
            clock,
            synchronizer,
            message_builder,
            state: SessionState::new(),
            cookies: RwLock::new(CookieMap::new()),
        })
    }
}
