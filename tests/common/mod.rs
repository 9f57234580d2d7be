//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let harness = TestClient::with_tokens("A1", "R1");
//! harness.http.set_response(REFRESH_URL, refresh_ok("A2"));
//! harness.client.get("/p1").await?;
//! ```

#![allow(dead_code)]

use agent_console::adapters::mock::{
    InMemoryCredentialStore, MockHttpClient, MockResponse, RecordingNavigator,
};
use agent_console::traits::{CredentialKind, CredentialStore};
use agent_console::{ApiClient, ClientConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://console.test";
pub const REFRESH_URL: &str = "http://console.test/api/auth/refresh";
pub const SIGN_IN_URL: &str = "http://console.test/login";

/// Long enough that every concurrent 401 lands while the refresh is open.
pub const REFRESH_DELAY: Duration = Duration::from_millis(50);

pub fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

/// Successful refresh without rotation.
pub fn refresh_ok(access_token: &str) -> MockResponse {
    MockResponse::json(200, json!({ "accessToken": access_token }))
}

/// Successful refresh that rotates the refresh credential.
pub fn refresh_rotated(access_token: &str, refresh_token: &str) -> MockResponse {
    MockResponse::json(
        200,
        json!({ "accessToken": access_token, "refreshToken": refresh_token }),
    )
}

/// An [`ApiClient`] wired to in-memory doubles, plus handles to inspect them.
pub struct TestClient {
    pub client: ApiClient,
    pub http: MockHttpClient,
    pub store: InMemoryCredentialStore,
    pub navigator: RecordingNavigator,
}

impl TestClient {
    pub fn new(store: InMemoryCredentialStore) -> Self {
        let http = MockHttpClient::new();
        let navigator = RecordingNavigator::new();
        let client = ApiClient::new(
            ClientConfig::new().with_base_url(BASE_URL),
            Arc::new(http.clone()),
            Arc::new(store.clone()),
            Arc::new(navigator.clone()),
        );
        Self {
            client,
            http,
            store,
            navigator,
        }
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self::new(InMemoryCredentialStore::with_tokens(access, refresh))
    }

    pub fn empty() -> Self {
        Self::new(InMemoryCredentialStore::new())
    }

    /// Answer `path` with 401 for any bearer other than `accepted`.
    pub fn accept_only(&self, accepted: &'static str) {
        let expected = format!("Bearer {}", accepted);
        self.http.set_handler(move |request| {
            if request.url.ends_with("/api/auth/refresh") {
                return None;
            }
            if request.header("authorization") == Some(expected.as_str()) {
                Some(MockResponse::json(200, json!({ "url": request.url })))
            } else {
                Some(MockResponse::status(401))
            }
        });
    }

    pub fn access(&self) -> Option<String> {
        self.store.get(CredentialKind::Access)
    }

    pub fn refresh(&self) -> Option<String> {
        self.store.get(CredentialKind::Refresh)
    }

    pub fn refresh_calls(&self) -> usize {
        self.http.requests_to(REFRESH_URL).len()
    }

    pub fn bearers_for(&self, path: &str) -> Vec<Option<String>> {
        self.http
            .requests_to(&url(path))
            .iter()
            .map(|r| r.header("authorization").map(str::to_string))
            .collect()
    }
}
