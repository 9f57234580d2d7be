//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that records every request and
//! returns predefined responses or errors.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{HttpClient, HttpError, HttpRequest, Response};

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this response (any status)
    Reply(Response),
    /// Fail at the transport level
    Error(HttpError),
}

impl MockResponse {
    /// Empty response with the given status.
    pub fn status(status: u16) -> Self {
        MockResponse::Reply(Response::new(status, bytes::Bytes::new()))
    }

    /// JSON response with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Reply(Response::json_body(status, &value))
    }
}

type Handler = Arc<dyn Fn(&HttpRequest) -> Option<MockResponse> + Send + Sync>;

/// Mock HTTP client for testing.
///
/// Resolution order for a request URL:
/// 1. responses queued with [`push_response`](Self::push_response), one per request
/// 2. fixed responses set with [`set_response`](Self::set_response)
/// 3. the handler set with [`set_handler`](Self::set_handler)
/// 4. the default response
///
/// URL keys match exactly first, then as prefixes.
///
/// # Example
///
/// ```ignore
/// use agent_console::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response("http://api/p1", MockResponse::status(401));
/// client.push_response("http://api/p1", MockResponse::json(200, json!({"ok": true})));
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    handler: Arc<Mutex<Option<Handler>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("requests", &self.requests.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(HashMap::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            handler: Arc::new(Mutex::new(None)),
            default_response: Arc::new(Mutex::new(None)),
            delays: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response returned for every request to `url`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Queue a response consumed by the next request to `url`.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Decide responses from the request itself (e.g. its headers).
    ///
    /// Returning `None` falls through to the default response.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&HttpRequest) -> Option<MockResponse> + Send + Sync + 'static,
    {
        *self.handler.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Delay responses for URLs starting with `url_prefix`.
    pub fn set_delay(&self, url_prefix: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(url_prefix.to_string(), delay);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL equals `url`.
    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn lookup<'a, V>(map: &'a HashMap<String, V>, url: &str) -> Option<(&'a String, &'a V)> {
        map.get_key_value(url)
            .or_else(|| map.iter().find(|(pattern, _)| url.starts_with(pattern.as_str())))
    }

    fn resolve(&self, request: &HttpRequest) -> Option<MockResponse> {
        {
            let mut queued = self.queued.lock().unwrap();
            let key = Self::lookup(&queued, &request.url)
                .filter(|(_, q)| !q.is_empty())
                .map(|(k, _)| k.clone());
            if let Some(key) = key {
                if let Some(response) = queued.get_mut(&key).and_then(VecDeque::pop_front) {
                    return Some(response);
                }
            }
        }

        if let Some((_, response)) = Self::lookup(&self.responses.lock().unwrap(), &request.url) {
            return Some(response.clone());
        }

        let handler = self.handler.lock().unwrap().clone();
        if let Some(response) = handler.and_then(|h| h(request)) {
            return Some(response);
        }

        self.default_response.lock().unwrap().clone()
    }

    fn delay_for(&self, url: &str) -> Option<Duration> {
        Self::lookup(&self.delays.lock().unwrap(), url).map(|(_, d)| *d)
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        let response = self.resolve(request);

        if let Some(delay) = self.delay_for(&request.url) {
            tokio::time::sleep(delay).await;
        }

        match response {
            Some(MockResponse::Reply(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Method;

    fn get(url: &str) -> HttpRequest {
        HttpRequest::new(Method::Get, url)
    }

    #[tokio::test]
    async fn test_set_response_is_sticky() {
        let client = MockHttpClient::new();
        client.set_response("http://api/x", MockResponse::status(204));

        for _ in 0..2 {
            let response = client.send(&get("http://api/x")).await.unwrap();
            assert_eq!(response.status, 204);
        }
        assert_eq!(client.requests_to("http://api/x").len(), 2);
    }

    #[tokio::test]
    async fn test_queued_responses_in_order() {
        let client = MockHttpClient::new();
        client.push_response("http://api/x", MockResponse::status(401));
        client.push_response("http://api/x", MockResponse::status(200));
        client.set_default_response(MockResponse::status(500));

        assert_eq!(client.send(&get("http://api/x")).await.unwrap().status, 401);
        assert_eq!(client.send(&get("http://api/x")).await.unwrap().status, 200);
        assert_eq!(client.send(&get("http://api/x")).await.unwrap().status, 500);
    }

    #[tokio::test]
    async fn test_handler_sees_headers() {
        let client = MockHttpClient::new();
        client.set_handler(|request| match request.header("authorization") {
            Some("Bearer good") => Some(MockResponse::status(200)),
            _ => Some(MockResponse::status(401)),
        });

        let ok = get("http://api/x").with_header("Authorization", "Bearer good");
        let bad = get("http://api/x").with_header("Authorization", "Bearer stale");
        assert_eq!(client.send(&ok).await.unwrap().status, 200);
        assert_eq!(client.send(&bad).await.unwrap().status, 401);
    }

    #[tokio::test]
    async fn test_prefix_match() {
        let client = MockHttpClient::new();
        client.set_response("http://api/agents", MockResponse::status(200));

        let response = client.send(&get("http://api/agents/42")).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_error_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://api/x",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let err = client.send(&get("http://api/x")).await.unwrap_err();
        assert_eq!(err, HttpError::ConnectionFailed("refused".to_string()));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.send(&get("http://api/missing")).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::status(200));
        let cloned = client.clone();

        cloned.send(&get("http://api/x")).await.unwrap();
        assert_eq!(client.get_requests().len(), 1);

        client.clear_requests();
        assert!(cloned.get_requests().is_empty());
    }
}
