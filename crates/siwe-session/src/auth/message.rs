/*
[INPUT]:  Session configuration, issued-at instant, signing capability
[OUTPUT]: Canonical EIP-4361 login message and its signature
[POS]:    Auth layer - sign-in message construction
[UPDATE]: When the sign-in message layout or nonce generation changes
*/

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::auth::MessageSigner;
use crate::http::{Result, SessionError};
use crate::types::SessionConfig;

const NONCE_LENGTH: usize = 17;

/// Longest accepted session, 100 years
pub const MAX_SESSION_DURATION_MS: u64 = 100 * 365 * 24 * 60 * 60 * 1_000;

/// Coerce an address into its EIP-55 mixed-case checksum form.
///
/// Verifiers compare the message address against the checksummed signing
/// address, so lowercase input must be normalized before signing.
pub fn checksum_address(address: &str) -> Result<String> {
    let address = address.trim();
    Address::from_str(address)
        .map(|address| address.to_checksum(None))
        .map_err(|e| SessionError::InvalidAddress(format!("{address}: {e}")))
}

/// Random alphanumeric nonce, unique per message
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

fn iso_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Structured sign-in message; `Display` renders the exact text that is signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweMessage {
    pub domain: String,
    pub address: String,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
    pub expiration_time: Option<DateTime<Utc>>,
    pub not_before: Option<DateTime<Utc>>,
    pub request_id: Option<String>,
    pub resources: Vec<String>,
}

impl SiweMessage {
    pub fn prepare_message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiweMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} wants you to sign in with your Ethereum account:",
            self.domain
        )?;
        writeln!(f, "{}", self.address)?;
        writeln!(f)?;
        if let Some(statement) = &self.statement {
            writeln!(f, "{statement}")?;
            writeln!(f)?;
        }
        writeln!(f, "URI: {}", self.uri)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        write!(f, "Issued At: {}", iso_timestamp(&self.issued_at))?;
        if let Some(expiration_time) = &self.expiration_time {
            write!(f, "\nExpiration Time: {}", iso_timestamp(expiration_time))?;
        }
        if let Some(not_before) = &self.not_before {
            write!(f, "\nNot Before: {}", iso_timestamp(not_before))?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, "\nRequest ID: {request_id}")?;
        }
        if !self.resources.is_empty() {
            write!(f, "\nResources:")?;
            for resource in &self.resources {
                write!(f, "\n- {resource}")?;
            }
        }
        Ok(())
    }
}

/// Canonical message text plus the signer's signature over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLoginMessage {
    pub message: String,
    pub signature: String,
    pub expiration_time: DateTime<Utc>,
}

/// Builds login messages bound to one session configuration
#[derive(Debug, Clone)]
pub struct LoginMessageBuilder {
    domain: String,
    address: String,
    statement: String,
    uri: String,
    version: String,
    chain_id: u64,
    session_duration: Duration,
}

impl LoginMessageBuilder {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let domain = config
            .login_url
            .host_str()
            .ok_or_else(|| {
                SessionError::Config(format!("Login URL has no host: {}", config.login_url))
            })?
            .to_string();
        if config.session_duration_ms > MAX_SESSION_DURATION_MS {
            return Err(SessionError::Config(format!(
                "Session duration {}ms exceeds maximum of {}ms",
                config.session_duration_ms, MAX_SESSION_DURATION_MS
            )));
        }
        let session_duration = i64::try_from(config.session_duration_ms)
            .map(Duration::milliseconds)
            .map_err(|_| SessionError::Config("Session duration out of range".to_string()))?;

        Ok(Self {
            domain,
            address: checksum_address(&config.account_address)?,
            statement: config.statement.clone(),
            uri: config.login_url.to_string(),
            version: config.version.clone(),
            chain_id: config.chain_id,
            session_duration,
        })
    }

    /// Checksummed account address placed in every message
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Build a message with a fresh nonce
    pub fn build(&self, issued_at: DateTime<Utc>) -> SiweMessage {
        self.build_with_nonce(issued_at, generate_nonce())
    }

    pub fn build_with_nonce(&self, issued_at: DateTime<Utc>, nonce: impl Into<String>) -> SiweMessage {
        SiweMessage {
            domain: self.domain.clone(),
            address: self.address.clone(),
            statement: Some(self.statement.clone()).filter(|statement| !statement.is_empty()),
            uri: self.uri.clone(),
            version: self.version.clone(),
            chain_id: self.chain_id,
            nonce: nonce.into(),
            issued_at,
            expiration_time: issued_at.checked_add_signed(self.session_duration),
            not_before: None,
            request_id: None,
            resources: Vec::new(),
        }
    }

    /// Render `message` canonically and have `signer` sign it
    pub async fn sign(
        &self,
        message: &SiweMessage,
        signer: &dyn MessageSigner,
    ) -> Result<SignedLoginMessage> {
        let expiration_time = message
            .expiration_time
            .or_else(|| message.issued_at.checked_add_signed(self.session_duration))
            .ok_or_else(|| {
                SessionError::Config(format!(
                    "Expiration time out of range for issued-at {}",
                    message.issued_at
                ))
            })?;
        let text = message.prepare_message();
        let signature = signer.sign_message(&text).await?;
        Ok(SignedLoginMessage {
            message: text,
            signature,
            expiration_time,
        })
    }
}
