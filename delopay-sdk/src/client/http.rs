//! Request execution: URL building, headers, timeout, retry and error
//! normalization.
//!
//! Every facade call goes through [`HttpClient::execute`]. A call is a
//! sequence of attempts; each attempt ends in an [`Attempt`] outcome and the
//! retry loop is a plain state machine over it.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::error::{ApiError, NO_STATUS};
use super::transport::{Method, Transport, TransportError, TransportRequest, TransportResponse};
use crate::config::TransportConfig;

/// Backoff before the first retry. Doubles per attempt.
const BACKOFF_BASE_MS: u64 = 100;

/// Upper bound for a single backoff delay.
const BACKOFF_MAX_MS: u64 = 1_000;

/// Header carrying the server-side correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Percent-encode an untrusted identifier so it occupies exactly one path
/// segment (`/`, `#`, `?`, spaces and the like are all escaped).
pub fn encode_segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Delay before the retry that follows attempt number `attempt` (0-based):
/// `min(1000ms, 100ms * 2^attempt)`.
pub fn backoff(attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_MAX_MS))
}

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for QueryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryValue::Str(value) => f.write_str(value),
            QueryValue::Int(value) => write!(f, "{value}"),
            QueryValue::Float(value) => write!(f, "{value}"),
            QueryValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_owned())
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Str(value.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Description of one logical API call, before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, identifiers already encoded.
    pub path: String,
    /// Query entries in insertion order. `None` values are never sent.
    pub query: Vec<(String, Option<QueryValue>)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::Head, path)
    }

    /// Add a query entry. An absent value is recorded but omitted from the URL.
    pub fn query<V: Into<QueryValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.query.push((name.into(), value.map(Into::into)));
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::new(NO_STATUS, format!("Failed to serialize request body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Outcome of a single attempt.
enum Attempt<T> {
    Success(Option<T>),
    /// May be retried if the call is idempotent and budget remains.
    Retryable(ApiError),
    /// Ends the call immediately.
    Terminal(ApiError),
}

/// Executes [`ApiRequest`]s against the configured API.
///
/// Cheap to clone; the configuration and transport are shared and never
/// mutated, so concurrent calls need no coordination.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<TransportConfig>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(config: TransportConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Execute `request`, retrying idempotent methods on 5xx responses and
    /// retryable transport failures.
    ///
    /// Returns `Ok(None)` for 204 responses and empty 2xx bodies.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let retries = if request.method.is_idempotent() {
            self.config.max_retries
        } else {
            0
        };
        let prepared = self.prepare(&request)?;

        for attempt in 0..=retries {
            debug!(
                method = %request.method,
                path = %request.path,
                attempt,
                "Sending API request"
            );

            match self.attempt::<T>(prepared.clone()).await {
                Attempt::Success(value) => return Ok(value),
                Attempt::Retryable(error) if attempt < retries => {
                    let delay = backoff(attempt);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        status = error.status,
                        delay_ms = delay.as_millis() as u64,
                        "API request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Attempt::Retryable(error) | Attempt::Terminal(error) => {
                    debug!(
                        method = %request.method,
                        path = %request.path,
                        status = error.status,
                        "API request failed"
                    );
                    return Err(error);
                }
            }
        }

        Err(ApiError::exhausted())
    }

    /// Resolve `path` under the base URL and append every present query entry.
    pub fn build_url(
        &self,
        path: &str,
        query: &[(String, Option<QueryValue>)],
    ) -> Result<Url, ApiError> {
        let mut url = self
            .config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::new(NO_STATUS, format!("Invalid request path `{path}`: {e}")))?;

        let mut present = query
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name, value)))
            .peekable();
        if present.peek().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in present {
                pairs.append_pair(name, &value.to_string());
            }
        }

        Ok(url)
    }

    fn prepare(&self, request: &ApiRequest) -> Result<TransportRequest, ApiError> {
        let url = self.build_url(&request.path, &request.query)?;

        let mut headers = vec![
            ("Authorization", format!("Bearer {}", self.config.api_key)),
            ("Accept", JSON_CONTENT_TYPE.to_owned()),
        ];

        let body = match &request.body {
            Some(value) => {
                let bytes = serde_json::to_vec(value).map_err(|e| {
                    ApiError::new(NO_STATUS, format!("Failed to serialize request body: {e}"))
                })?;
                headers.push(("Content-Type", JSON_CONTENT_TYPE.to_owned()));
                Some(Bytes::from(bytes))
            }
            None => None,
        };

        Ok(TransportRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    async fn attempt<T: DeserializeOwned>(&self, request: TransportRequest) -> Attempt<T> {
        let timeout = self.config.timeout;
        let sent = tokio::time::timeout(timeout, self.transport.send(request, timeout)).await;

        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => return transport_failure(error),
            Err(_) => return transport_failure(TransportError::Timeout),
        };

        if (200..300).contains(&response.status) {
            decode_success(response)
        } else {
            let status = response.status;
            let error = ApiError::from_response(
                status,
                response.reason.as_deref(),
                response.header(REQUEST_ID_HEADER).map(ToOwned::to_owned),
                &String::from_utf8_lossy(&response.body),
            );
            if status >= 500 {
                Attempt::Retryable(error)
            } else {
                Attempt::Terminal(error)
            }
        }
    }
}

fn transport_failure<T>(error: TransportError) -> Attempt<T> {
    let retryable = error.is_retryable();
    let error = ApiError::network(error);
    if retryable {
        Attempt::Retryable(error)
    } else {
        Attempt::Terminal(error)
    }
}

fn decode_success<T: DeserializeOwned>(response: TransportResponse) -> Attempt<T> {
    if response.status == 204 {
        return Attempt::Success(None);
    }

    let text = String::from_utf8_lossy(&response.body);
    if text.trim().is_empty() {
        return Attempt::Success(None);
    }

    match serde_json::from_str::<T>(&text) {
        Ok(value) => Attempt::Success(Some(value)),
        Err(e) => Attempt::Terminal(
            ApiError::new(NO_STATUS, format!("Failed to decode response body: {e}"))
                .with_raw(Value::String(text.into_owned())),
        ),
    }
}
