/*
[INPUT]:  Clock endpoint response body
[OUTPUT]: Typed clock response
[POS]:    Data layer - type definitions for clock synchronization
[UPDATE]: When the clock wire shape changes
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{Result, SessionError};

/// `{"time": "<ISO-8601>"}` as returned by the clock endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockResponse {
    pub time: String,
}

impl ClockResponse {
    /// Parse the reported server time
    pub fn server_time(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.time.trim())
            .map(|time| time.with_timezone(&Utc))
            .map_err(|e| {
                SessionError::InvalidResponse(format!(
                    "Invalid clock time '{}': {e}",
                    self.time
                ))
            })
    }
}
