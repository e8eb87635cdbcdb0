/*
[INPUT]:  Session configuration and signing capability
[OUTPUT]: Signed login messages, session state and authenticated requests
[POS]:    Auth layer - sign-in session management
[UPDATE]: When auth flow or signature methods change
*/

pub mod evm_wallet;
pub mod manager;
pub mod message;
pub mod session;
pub mod wallet;

pub use evm_wallet::EvmWalletSigner;
pub use manager::{SessionManager, SessionManagerBuilder};
pub use message::{
    LoginMessageBuilder, MAX_SESSION_DURATION_MS, SignedLoginMessage, SiweMessage,
    checksum_address, generate_nonce,
};
pub use session::SessionState;
pub use wallet::{FnSigner, MessageSigner, MockMessageSigner};
