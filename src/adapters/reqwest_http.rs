//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production transport, implementing the
//! [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{
    FormData, FormValue, Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody,
    Response,
};

/// HTTP client implementation using reqwest.
///
/// ```ignore
/// use agent_console::adapters::ReqwestHttpClient;
/// use agent_console::traits::{HttpClient, HttpRequest, Method};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.send(&HttpRequest::new(Method::Get, "https://api.example.com/health")).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidRequest(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Build a multipart form. reqwest sets the content type and boundary.
    fn build_form(form: &FormData) -> Result<reqwest::multipart::Form, HttpError> {
        let mut multipart = reqwest::multipart::Form::new();
        for part in form.parts() {
            multipart = match &part.value {
                FormValue::Text(value) => multipart.text(part.name.clone(), value.clone()),
                FormValue::File {
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let mut file_part =
                        reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name.clone());
                    if let Some(mime) = mime_type {
                        file_part = file_part
                            .mime_str(mime)
                            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
                    }
                    multipart.part(part.name.clone(), file_part)
                }
            };
        }
        Ok(multipart)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        let builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        let builder = Self::apply_headers(builder, &request.headers);
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Text(body) => builder.body(body.clone()),
            RequestBody::Multipart(form) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}
