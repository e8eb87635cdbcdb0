/*
[INPUT]:  Error sources (transport, login endpoint, signer, parsing, config)
[OUTPUT]: Structured error types with network/auth classification
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the session core
#[derive(Error, Debug)]
pub enum SessionError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("Unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request aborted by the configured per-request timeout
    #[error("Request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Login endpoint rejected the signed message
    #[error("Received error response on login (status {status}): {body}")]
    Authentication { status: u16, body: String },

    /// The injected signing capability failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Response body did not match the expected schema
    #[error("Error validating object with schema {schema}: {issues}")]
    Validation { schema: String, issues: String },

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Account address could not be parsed
    #[error("Invalid account address: {0}")]
    InvalidAddress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SessionError {
    /// True for transport failures, timeouts and non-2xx statuses
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            SessionError::Http(_) | SessionError::Status { .. } | SessionError::Timeout { .. }
        )
    }

    /// True when the request was aborted because it took too long
    pub fn is_timeout(&self) -> bool {
        match self {
            SessionError::Timeout { .. } => true,
            SessionError::Http(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SessionError::Authentication { .. } | SessionError::Signing(_)
        )
    }

    /// Whether a caller-side retry policy may reasonably try again.
    ///
    /// The core itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Http(_) | SessionError::Timeout { .. } => true,
            SessionError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Create a status error from a response status and body text
    pub fn status_error(status: StatusCode, body: impl Into<String>) -> Self {
        SessionError::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// Create a validation error for the outer response-validation layer
    pub fn validation(schema: impl Into<String>, issues: impl Into<String>) -> Self {
        SessionError::Validation {
            schema: schema.into(),
            issues: issues.into(),
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
