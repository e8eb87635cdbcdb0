/*
[INPUT]:  Signed login message and per-call login options
[OUTPUT]: Login request body and parameters
[POS]:    Data layer - type definitions for the login call
[UPDATE]: When the login wire shape changes
*/

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Body POSTed to the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub message: String,
    pub signature: String,
}

/// Optional overrides for a single login call
#[derive(Debug, Clone, Default)]
pub struct LoginParams {
    /// Explicit issued-at; when absent the server clock is consulted
    pub issued_at: Option<DateTime<Utc>>,
    /// Extra headers, replacing configured ones with the same name
    pub headers: HeaderMap,
}

impl LoginParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
