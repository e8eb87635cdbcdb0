/*
[INPUT]:  Local and remote clock instants, login response cookies
[OUTPUT]: Clock offset estimates and the in-memory cookie map
[POS]:    Data layer - value types shared by the clock and session layers
[UPDATE]: When the clock estimator or cookie representation changes
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cookie name to cookie value, rebuilt on every successful login
pub type CookieMap = BTreeMap<String, String>;

/// One NTP-style round trip, all instants in epoch milliseconds.
///
/// `t0` request sent (local), `t1` remote receive, `t2` remote send,
/// `t3` response received (local).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSample {
    pub t0: i64,
    pub t1: i64,
    pub t2: i64,
    pub t3: i64,
}

impl ClockSample {
    /// Build a sample from a single remote timestamp; the server is assumed
    /// to receive and reply at the same instant, so `t2 = t1`.
    pub fn from_round_trip(t0: i64, remote: i64, t3: i64) -> Self {
        Self {
            t0,
            t1: remote,
            t2: remote,
            t3,
        }
    }

    pub fn clock_diff(&self) -> ClockDiff {
        calculate_clock_diff(self)
    }
}

/// Estimated offset between remote and local clocks.
///
/// Positive `diff` means the remote clock is ahead. `max_error` is half the
/// observed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDiff {
    pub diff: i64,
    #[serde(rename = "maxError")]
    pub max_error: i64,
}

impl ClockDiff {
    /// Server time for local instant `now`, biased early by the max error
    pub fn server_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::milliseconds(self.diff - self.max_error)
    }
}

/// https://en.wikipedia.org/wiki/Network_Time_Protocol#Clock_synchronization_algorithm
pub fn calculate_clock_diff(sample: &ClockSample) -> ClockDiff {
    let ClockSample { t0, t1, t2, t3 } = *sample;
    ClockDiff {
        diff: ((t1 - t0) + (t2 - t3)).div_euclid(2),
        max_error: (t3 - t0).div_euclid(2),
    }
}
