//! Call descriptions that can be sent more than once.

use crate::traits::{FormData, Headers, HttpRequest, Method, RequestBody};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// Caller-supplied options for [`ApiClient::call`](super::ApiClient::call).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    /// GET with no headers or body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// JSON request body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A caller's unresolved call: everything needed to issue it again.
///
/// The access credential is not part of it; each attempt is built with
/// whatever credential is current at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    path: String,
    method: Method,
    headers: Headers,
    body: RequestBody,
}

impl PendingCall {
    /// A JSON call.
    ///
    /// Caller headers are kept except `Authorization`, which only the client
    /// sets. `Content-Type: application/json` is added unless the caller
    /// chose a content type.
    pub fn json(path: impl Into<String>, options: RequestOptions) -> Self {
        let mut headers = strip_authorization(options.headers);
        if !has_header(&headers, CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE.to_string(), JSON.to_string());
        }
        let body = match options.body {
            Some(value) => RequestBody::Text(value.to_string()),
            None => RequestBody::Empty,
        };
        Self {
            path: path.into(),
            method: options.method,
            headers,
            body,
        }
    }

    /// A multipart POST. No content type is set so the transport can add
    /// the boundary.
    pub fn upload(path: impl Into<String>, form: FormData) -> Self {
        Self {
            path: path.into(),
            method: Method::Post,
            headers: Headers::new(),
            body: RequestBody::Multipart(form),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Build one attempt against `url`, attaching `access_token` if present.
    pub fn to_request(&self, url: String, access_token: Option<&str>) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, url).with_body(self.body.clone());
        request.headers = self.headers.clone();
        if let Some(token) = access_token {
            request
                .headers
                .insert(AUTHORIZATION.to_string(), format!("Bearer {}", token));
        }
        request
    }
}

fn has_header(headers: &Headers, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}

fn strip_authorization(mut headers: Headers) -> Headers {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(AUTHORIZATION));
    headers
}
