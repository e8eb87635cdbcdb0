/*
[INPUT]:  Canonical login message text
[OUTPUT]: Signature string for authentication
[POS]:    Auth layer - injected signing capability
[UPDATE]: When adding new signer adapters or changing signature format
*/

use std::fmt;

use async_trait::async_trait;

use crate::http::{Result, SessionError};

/// Signing capability handed to the session manager.
///
/// Opaque to the core: message text in, signature string out. The trait is
/// async to support hardware wallets and remote signers.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Sign a message and return the signature
    async fn sign_message(&self, message: &str) -> Result<String>;
}

/// Adapts an async closure into a [`MessageSigner`]
pub struct FnSigner<F> {
    sign: F,
}

impl<F, Fut> FnSigner<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    pub fn new(sign: F) -> Self {
        Self { sign }
    }
}

impl<F> fmt::Debug for FnSigner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSigner").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> MessageSigner for FnSigner<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn sign_message(&self, message: &str) -> Result<String> {
        (self.sign)(message.to_string()).await
    }
}

/// Mock signer for testing
#[derive(Debug, Clone)]
pub struct MockMessageSigner {
    outcome: std::result::Result<String, String>,
}

impl MockMessageSigner {
    /// Create a new mock signer with predetermined signature
    pub fn new(signature: &str) -> Self {
        Self {
            outcome: Ok(signature.to_string()),
        }
    }

    /// Create a mock signer that rejects every message
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl MessageSigner for MockMessageSigner {
    async fn sign_message(&self, _message: &str) -> Result<String> {
        self.outcome.clone().map_err(SessionError::Signing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signer() {
        let signer = MockMessageSigner::new("signed message");
        let signature = signer.sign_message("test message").await.unwrap();
        assert_eq!(signature, "signed message");
    }

    #[tokio::test]
    async fn test_failing_mock_signer() {
        let signer = MockMessageSigner::failing("user rejected");
        let err = signer.sign_message("test message").await.unwrap_err();
        assert!(matches!(err, SessionError::Signing(reason) if reason == "user rejected"));
    }

    #[tokio::test]
    async fn test_fn_signer_receives_message() {
        let signer = FnSigner::new(|message: String| async move {
            Ok::<_, SessionError>(format!("sig:{message}"))
        });
        let signature = signer.sign_message("hello").await.unwrap();
        assert_eq!(signature, "sig:hello");
    }
}
