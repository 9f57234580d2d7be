//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for HTTP operations, enabling
//! dependency injection and mocking in tests. Requests are described by
//! plain data ([`HttpRequest`]) so a dispatcher can rebuild and reissue them.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Plain text field
    Text(String),
    /// File attachment
    File {
        file_name: String,
        mime_type: Option<String>,
        bytes: Bytes,
    },
}

/// Named multipart form part.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Multipart form body.
///
/// Kept as plain data (file contents in [`Bytes`]) so the same form can be
/// sent again after a credential refresh. The transport encodes it and
/// chooses the multipart boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Append a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                mime_type,
                bytes: bytes.into(),
            },
        });
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Request body variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Pre-encoded text body (JSON for API calls)
    Text(String),
    /// Multipart form; no content type header is set by the caller
    Multipart(FormData),
}

/// Fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: RequestBody::Empty,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a response with a JSON body.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self {
            status,
            headers,
            body: Bytes::from(value.to_string()),
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport errors (no response was received).
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// The request could not be built
    InvalidRequest(String),
    /// IO error while reading the body
    Io(String),
    /// Other error
    Other(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP transports.
///
/// Implementations include the production reqwest-based client and the
/// mock client used in tests. A transport performs exactly one network
/// exchange per `send` and never retries on its own.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the response, whatever its status.
    ///
    /// Only failures where no response was received are errors.
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError>;
}
