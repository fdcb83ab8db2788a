//! Pluggable HTTP transport.
//!
//! [`HttpClient`](super::HttpClient) never talks to sockets directly; it hands a
//! fully built [`TransportRequest`] to a [`Transport`] together with the
//! per-attempt deadline. [`ReqwestTransport`] is the default implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use url::Url;

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl Method {
    /// Whether repeating the request has no additional side effect.
    ///
    /// Only idempotent requests are retried.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully resolved HTTP request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response of one HTTP exchange, body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Reason phrase for `status`, if known.
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl TransportResponse {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Failures reported by a [`Transport`] when no response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The per-attempt deadline passed before the exchange finished.
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body-read failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be sent at all (e.g. an invalid header value).
    #[error("invalid request: {0}")]
    Request(String),
}

impl TransportError {
    /// Timeouts and network failures may succeed on a fresh attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Network(_))
    }
}

/// Capability to perform a single HTTP exchange.
///
/// Implementations must stop waiting once `timeout` has elapsed and report
/// [`TransportError::Timeout`]. The caller enforces the deadline as well, so a
/// transport that overruns is cut off regardless.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[cfg(feature = "client")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[cfg(feature = "client")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy or TLS roots).
    pub fn with_http_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }
}

#[cfg(feature = "client")]
impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[cfg(feature = "client")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url)
            .timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.bytes().await.map_err(classify_reqwest_error)?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(ToOwned::to_owned),
            headers,
            body,
        })
    }
}

#[cfg(feature = "client")]
fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::Request(error.to_string())
    } else {
        TransportError::Network(error.to_string())
    }
}
