/*
[INPUT]:  Clock endpoint, local time source
[OUTPUT]: Clock offset estimates and approximate server time
[POS]:    HTTP layer - NTP-style clock synchronization against the server
[UPDATE]: When changing the clock estimator or clock endpoint handling
*/

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Method, Request};
use tracing::debug;
use url::Url;

use crate::http::{HttpTransport, Result, SessionError};
use crate::types::{ClockDiff, ClockResponse, ClockSample};

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Queued instants are handed out one per call; the last one repeats, so the
/// clock always has an instant to report.
#[derive(Debug)]
pub struct ManualClock {
    instants: Mutex<VecDeque<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            instants: Mutex::new(VecDeque::from([now])),
        }
    }

    /// Report `first`, then each of `rest` in order
    pub fn with_sequence(
        first: DateTime<Utc>,
        rest: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> Self {
        let mut instants = VecDeque::from([first]);
        instants.extend(rest);
        Self {
            instants: Mutex::new(instants),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.instants.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.push_back(now);
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.instants.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.len() > 1 {
            if let Some(now) = guard.pop_front() {
                return now;
            }
        }
        guard.front().copied().unwrap_or_else(Utc::now)
    }
}

/// Estimates the offset between the local clock and the server's
#[derive(Clone)]
pub struct ClockSynchronizer {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    clock_url: Url,
    headers: HeaderMap,
}

impl fmt::Debug for ClockSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockSynchronizer")
            .field("clock_url", &self.clock_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ClockSynchronizer {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        clock_url: Url,
        headers: HeaderMap,
    ) -> Self {
        Self {
            transport,
            clock,
            clock_url,
            headers,
        }
    }

    /// GET the clock endpoint
    pub async fn get_clock(&self) -> Result<ClockResponse> {
        let mut request = Request::new(Method::GET, self.clock_url.clone());
        *request.headers_mut() = self.headers.clone();

        let response = self.transport.fetch(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SessionError::status_error(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Single round-trip estimate of the server clock offset
    pub async fn get_clock_diff_approx(&self) -> Result<ClockDiff> {
        let t0 = self.clock.now().timestamp_millis();
        let clock_response = self.get_clock().await?;
        let t3 = self.clock.now().timestamp_millis();

        let t1 = clock_response.server_time()?.timestamp_millis();
        let clock_diff = ClockSample::from_round_trip(t0, t1, t3).clock_diff();
        debug!(
            diff_ms = clock_diff.diff,
            max_error_ms = clock_diff.max_error,
            "estimated server clock offset"
        );
        Ok(clock_diff)
    }

    /// Earliest plausible current server time.
    ///
    /// Biased early by the max error so a message issued at this instant is
    /// never in the server's future.
    pub async fn get_server_time_approx(&self) -> Result<DateTime<Utc>> {
        let clock_diff = self.get_clock_diff_approx().await?;
        Ok(clock_diff.server_time(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use reqwest::Client;
    use reqwest::header::{AUTHORIZATION, HeaderValue};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn synchronizer(server: &MockServer, clock: Arc<dyn Clock>) -> ClockSynchronizer {
        let clock_url = Url::parse(&format!("{}/clock", server.uri())).unwrap();
        ClockSynchronizer::new(Arc::new(Client::new()), clock, clock_url, HeaderMap::new())
    }

    async fn mount_clock(server: &MockServer, time: &str) {
        Mock::given(method("GET"))
            .and(path("/clock"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "time": time })),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_manual_clock_sequence_then_repeats() {
        let clock = ManualClock::with_sequence(at(1), [at(2)]);
        assert_eq!(clock.now(), at(1));
        assert_eq!(clock.now(), at(2));
        assert_eq!(clock.now(), at(2));

        clock.advance(Duration::milliseconds(10));
        assert_eq!(clock.now(), at(12));
    }

    #[test]
    fn test_manual_clock_single_instant_repeats() {
        let clock = ManualClock::new(at(5));
        assert_eq!(clock.now(), at(5));
        assert_eq!(clock.now(), at(5));
    }

    #[tokio::test]
    async fn test_clock_diff_uses_round_trip_instants() {
        let server = MockServer::start().await;
        // t1 = 2022-05-02T22:05:56.500Z
        mount_clock(&server, "2022-05-02T22:05:56.500Z").await;

        let t0 = 1_651_529_155_000;
        let t3 = 1_651_529_156_000;
        let clock = Arc::new(ManualClock::with_sequence(at(t0), [at(t3)]));
        let diff = synchronizer(&server, clock).get_clock_diff_approx().await.unwrap();

        assert_eq!(
            diff,
            ClockDiff {
                diff: 1_000,
                max_error: 500
            }
        );
    }

    #[tokio::test]
    async fn test_server_time_is_biased_early() {
        let server = MockServer::start().await;
        let now = 1_651_529_156_000;
        // t0 = now - 1000, t1 = now + 500, t3 = now: diff 1000, max error 500
        mount_clock(&server, "2022-05-02T22:05:56.500Z").await;

        let clock = Arc::new(ManualClock::with_sequence(at(now - 1_000), [at(now)]));
        let server_time = synchronizer(&server, clock)
            .get_server_time_approx()
            .await
            .unwrap();

        assert_eq!(server_time, at(now + 500));
    }

    #[tokio::test]
    async fn test_get_clock_sends_configured_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clock"))
            .and(header("authorization", "Bearer key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "time": "2022-05-01T00:00:00Z" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer key"));
        let clock_url = Url::parse(&format!("{}/clock", server.uri())).unwrap();
        let synchronizer = ClockSynchronizer::new(
            Arc::new(Client::new()),
            Arc::new(SystemClock),
            clock_url,
            headers,
        );

        let response = synchronizer.get_clock().await.unwrap();
        assert_eq!(response.time, "2022-05-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_clock_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clock"))
            .respond_with(ResponseTemplate::new(500).set_body_string("fake error message"))
            .mount(&server)
            .await;

        let err = synchronizer(&server, Arc::new(SystemClock))
            .get_clock_diff_approx()
            .await
            .unwrap_err();

        match err {
            SessionError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "fake error message");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clock_unparseable_time_is_invalid_response() {
        let server = MockServer::start().await;
        mount_clock(&server, "not a time").await;

        let err = synchronizer(&server, Arc::new(SystemClock))
            .get_server_time_approx()
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidResponse(_)));
    }
}
