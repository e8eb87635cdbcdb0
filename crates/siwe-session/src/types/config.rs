/*
[INPUT]:  Account address, endpoint URLs, provider settings
[OUTPUT]: Immutable session configuration
[POS]:    Configuration layer - session setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use super::enums::Network;
use crate::http::{Result, SessionError};

pub const DEFAULT_STATEMENT: &str = "Sign in with Ethereum";
pub const DEFAULT_VERSION: &str = "1";
/// 4 hours
pub const DEFAULT_SESSION_DURATION_MS: u64 = 14_400_000;

const LOGIN_PATH: &str = "/auth/login";
const CLOCK_PATH: &str = "/clock";

/// Settings fixed for the lifetime of a session manager
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub account_address: String,
    pub statement: String,
    pub version: String,
    pub chain_id: u64,
    pub session_duration_ms: u64,
    pub login_url: Url,
    pub clock_url: Url,
    /// Sent with every login and clock request
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn new(
        account_address: impl Into<String>,
        chain_id: u64,
        login_url: &str,
        clock_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            account_address: account_address.into(),
            statement: DEFAULT_STATEMENT.to_string(),
            version: DEFAULT_VERSION.to_string(),
            chain_id,
            session_duration_ms: DEFAULT_SESSION_DURATION_MS,
            login_url: Url::parse(login_url)?,
            clock_url: Url::parse(clock_url)?,
            headers: HeaderMap::new(),
            timeout: None,
        })
    }

    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_session_duration_ms(mut self, session_duration_ms: u64) -> Self {
        self.session_duration_ms = session_duration_ms;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Map a provider description onto session settings
    pub fn from_provider(provider: &ProviderConfig) -> Result<Self> {
        let base_url = provider.base_url.trim_end_matches('/');
        let mut config = Self::new(
            provider.account_address.clone(),
            provider.network.chain_id(),
            &format!("{base_url}{LOGIN_PATH}"),
            &format!("{base_url}{CLOCK_PATH}"),
        )?;

        if let Some(api_key) = &provider.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| SessionError::Config(format!("Invalid api key header: {e}")))?;
            config.headers.insert(AUTHORIZATION, value);
        }
        if let Some(timeout_ms) = provider.timeout_ms {
            config.timeout = Some(Duration::from_millis(timeout_ms));
        }

        Ok(config)
    }
}

/// Provider-level description, typically loaded from a config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub network: Network,
    pub account_address: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
