/*
[INPUT]:  Transport configuration, clock and login endpoints
[OUTPUT]: Transports, clock estimates, cookie maps and typed errors
[POS]:    HTTP layer - network plumbing under the session manager
[UPDATE]: When adding transports, cookie strategies or error sources
*/

pub mod client;
pub mod clock;
pub mod cookies;
pub mod error;
pub mod transport;

pub use error::{Result, SessionError};

pub use client::{ClientConfig, cookie_client};
pub use clock::{Clock, ClockSynchronizer, ManualClock, SystemClock};
pub use cookies::{
    CookieExtractor, CookieJarExtractor, SetCookieHeaderExtractor, SetCookieListExtractor,
    cookie_header_value,
};
pub use transport::{HttpTransport, TimeoutTransport};
