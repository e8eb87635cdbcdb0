/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public sign-in session crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    EvmWalletSigner,
    FnSigner,
    LoginMessageBuilder,
    MAX_SESSION_DURATION_MS,
    MessageSigner,
    MockMessageSigner,
    SessionManager,
    SessionManagerBuilder,
    SessionState,
    SignedLoginMessage,
    SiweMessage,
};

// Re-export commonly used types from http
pub use http::{
    Clock,
    ClockSynchronizer,
    CookieExtractor,
    CookieJarExtractor,
    HttpTransport,
    ManualClock,
    Result,
    SessionError,
    SetCookieHeaderExtractor,
    SetCookieListExtractor,
    SystemClock,
    TimeoutTransport,
};

// Re-export all types
pub use types::*;
