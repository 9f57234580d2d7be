//! End-to-end tests over real HTTP.
//!
//! The reqwest transport and the file-backed credential store run against
//! a wiremock server, so these cover the wire format of the refresh call,
//! bearer headers, multipart uploads, and persistence of renewed
//! credentials.

use agent_console::adapters::mock::RecordingNavigator;
use agent_console::adapters::{FileCredentialStore, ReqwestHttpClient};
use agent_console::traits::{CredentialKind, CredentialStore, FormData, Method};
use agent_console::{ApiClient, ApiError, ClientConfig, RequestOptions};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    client: ApiClient,
    navigator: RecordingNavigator,
    credentials_path: std::path::PathBuf,
    _dir: TempDir,
}

fn fixture(base_url: &str, tokens: Option<(&str, &str)>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let credentials_path = dir.path().join("credentials.json");

    let store = FileCredentialStore::open(&credentials_path);
    if let Some((access, refresh)) = tokens {
        store.set(CredentialKind::Access, access);
        store.set(CredentialKind::Refresh, refresh);
    }

    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_credentials_path(&credentials_path)
        .with_request_timeout(Duration::from_secs(5));
    let navigator = RecordingNavigator::new();
    let client = ApiClient::new(
        config.clone(),
        Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout).unwrap()),
        Arc::new(store),
        Arc::new(navigator.clone()),
    );

    Fixture {
        client,
        navigator,
        credentials_path,
        _dir: dir,
    }
}

fn persisted(path: &Path) -> (Option<String>, Option<String>) {
    let store = FileCredentialStore::open(path);
    (
        store.get(CredentialKind::Access),
        store.get(CredentialKind::Refresh),
    )
}

// ============================================================================
// Refresh over the wire
// ============================================================================

#[tokio::test]
async fn test_concurrent_401s_issue_one_refresh_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "A2" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    for p in ["/p1", "/p2", "/p3"] {
        Mock::given(method("GET"))
            .and(path(p))
            .and(header("authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(p))
            .and(header("authorization", "Bearer A2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "path": p })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    let (r1, r2, r3) = tokio::join!(
        f.client.get("/p1"),
        f.client.get("/p2"),
        f.client.get("/p3"),
    );

    assert_eq!(r1.unwrap(), json!({ "path": "/p1" }));
    assert_eq!(r2.unwrap(), json!({ "path": "/p2" }));
    assert_eq!(r3.unwrap(), json!({ "path": "/p3" }));
    assert_eq!(
        persisted(&f.credentials_path),
        (Some("A2".to_string()), Some("R1".to_string()))
    );
    assert_eq!(f.navigator.redirect_count(), 0);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_persisted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "A2", "refreshToken": "R2" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })))
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    assert_eq!(f.client.get("/api/me").await.unwrap(), json!({ "id": "u1" }));
    assert_eq!(
        persisted(&f.credentials_path),
        (Some("A2".to_string()), Some("R2".to_string()))
    );
}

#[tokio::test]
async fn test_refresh_rejected_clears_credentials_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    let err = f.client.get("/api/me").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(!f.credentials_path.exists());
    assert_eq!(
        f.navigator.redirects(),
        vec![format!("{}/login", server.uri())]
    );
}

#[tokio::test]
async fn test_no_refresh_credential_never_calls_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), None);

    let err = f.client.get("/secure").await.unwrap_err();

    assert!(err.requires_reauth());
    assert_eq!(f.navigator.redirect_count(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_retry_rejected_makes_two_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "A2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    assert!(f.client.get("/x").await.unwrap_err().requires_reauth());
    assert_eq!(f.navigator.redirect_count(), 1);
    assert!(!f.credentials_path.exists());
}

// ============================================================================
// Requests and responses
// ============================================================================

#[tokio::test]
async fn test_json_call_sends_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agents"))
        .and(header("authorization", "Bearer A1"))
        .and(header("content-type", "application/json"))
        .and(header("x-foo", "bar"))
        .and(body_json(json!({ "name": "helper" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "a1" })))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    let value = f
        .client
        .call(
            "/api/agents",
            RequestOptions::new()
                .method(Method::Post)
                .header("X-Foo", "bar")
                .json(json!({ "name": "helper" })),
        )
        .await
        .unwrap();

    assert_eq!(value, json!({ "id": "a1" }));
}

#[tokio::test]
async fn test_failure_body_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/agents/a1"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "error": "Only owners can delete agents" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/usage"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    let forbidden = f.client.delete("/api/agents/a1").await.unwrap_err();
    let unavailable = f.client.get("/api/usage").await.unwrap_err();

    assert_eq!(forbidden.to_string(), "Only owners can delete agents");
    assert_eq!(unavailable.to_string(), "HTTP 503");
    assert_eq!(f.navigator.redirect_count(), 0);
    assert!(f.credentials_path.exists());
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/sessions/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    assert_eq!(
        f.client.delete("/api/sessions/s1").await.unwrap(),
        serde_json::Value::Null
    );
}

#[tokio::test]
async fn test_upload_sends_multipart_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "A2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/branding/logo"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/branding/logo"))
        .and(header("authorization", "Bearer A2"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"kind\""))
        .and(body_string_contains("filename=\"logo.svg\""))
        .and(body_string_contains("<svg/>"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "url": "/logo.svg" })))
        .expect(1)
        .mount(&server)
        .await;

    let f = fixture(&server.uri(), Some(("A1", "R1")));

    let form = FormData::new().text("kind", "logo").file(
        "file",
        "logo.svg",
        Some("image/svg+xml".to_string()),
        b"<svg/>".to_vec(),
    );
    let value = f.client.upload("/api/branding/logo", form).await.unwrap();

    assert_eq!(value, json!({ "url": "/logo.svg" }));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let f = fixture(&base_url, Some(("A1", "R1")));

    let err = f.client.get("/api/agents").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "{:?}", err);
    assert_eq!(f.navigator.redirect_count(), 0);
    assert!(f.credentials_path.exists());
}
