/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for siwe-session tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use siwe_session::{
    Clock, LoginRequest, ManualClock, MockMessageSigner, SessionConfig, SessionManager,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT_ADDRESS: &str = "0x0d8e461687b7d06f86ec348e0c270b0f279855f0";
pub const CHECKSUMMED_ADDRESS: &str = "0x0D8e461687b7D06f86EC348E0c270b0F279855F0";
pub const SIGNATURE: &str = "signed message";
pub const SESSION_DURATION_MS: u64 = 3_600_000;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

pub fn session_config(server: &MockServer) -> SessionConfig {
    SessionConfig::new(
        ACCOUNT_ADDRESS,
        1,
        &format!("{}/auth/login", server.uri()),
        &format!("{}/clock", server.uri()),
    )
    .unwrap()
    .with_session_duration_ms(SESSION_DURATION_MS)
}

/// Manager on a plain reqwest client with a hand-driven clock
pub fn session_manager(server: &MockServer, clock: &Arc<ManualClock>) -> SessionManager {
    SessionManager::builder(
        session_config(server),
        Arc::new(MockMessageSigner::new(SIGNATURE)),
    )
    .transport(Arc::new(reqwest::Client::new()))
    .clock(Arc::clone(clock) as Arc<dyn Clock>)
    .build()
    .unwrap()
}

pub async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_clock(server: &MockServer, time: &str) {
    Mock::given(method("GET"))
        .and(path("/clock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "time": time })))
        .mount(server)
        .await;
}

/// Login bodies received by the mock server, oldest first
pub async fn login_requests(server: &MockServer) -> Vec<LoginRequest> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/auth/login")
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

/// Value of a `Key: value` line in a canonical login message
pub fn message_field<'a>(message: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{key}: ");
    message
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}
