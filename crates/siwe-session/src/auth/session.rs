/*
[INPUT]:  Session expiry timestamps from successful logins
[OUTPUT]: Session liveness status
[POS]:    Auth layer - session lifecycle state
[UPDATE]: When changing what a live session means
*/

use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Expiry of the current session, if one was ever established.
///
/// Written only by a successful login; expiry happens by clock passage alone.
#[derive(Debug, Default)]
pub struct SessionState {
    expiry: RwLock<Option<DateTime<Utc>>>,
}

impl SessionState {
    /// Create an empty, unauthenticated state
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiry of the last successful login
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        *self.expiry.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Live iff an expiry is set and lies strictly after `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expiry().is_some_and(|expiry| expiry > now)
    }

    pub(crate) fn set_expiry(&self, expiry: DateTime<Utc>) {
        let mut guard = self.expiry.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(expiry);
    }
}
