/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: EIP-191 signatures and checksummed wallet address
[POS]:    Auth layer - local private-key signing capability
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::str::FromStr;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::{MessageSigner, checksum_address};
use crate::http::{Result, SessionError};

/// Signs login messages with a locally held EVM key
pub struct EvmWalletSigner {
    signer: PrivateKeySigner,
    address: String,
}

impl EvmWalletSigner {
    /// Create a new EVM wallet signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.trim();
        let private_key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| SessionError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = signer.address().to_checksum(None);

        Ok(Self { signer, address })
    }

    /// Checksummed address derived from the key
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Fail unless `expected` names the same account as the key
    pub fn ensure_address(&self, expected: &str) -> Result<()> {
        if checksum_address(expected)? == self.address {
            Ok(())
        } else {
            Err(SessionError::Config(format!(
                "Wallet address mismatch: provided {expected}, derived {}",
                self.address
            )))
        }
    }
}

#[async_trait]
impl MessageSigner for EvmWalletSigner {
    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| SessionError::Signing(format!("Failed to sign EVM message: {e}")))?;

        // r, s, v
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
