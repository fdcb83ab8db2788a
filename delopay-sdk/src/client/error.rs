//! The single error type returned by every API call.

use serde_json::Value;
use thiserror::Error;

/// Status used when no HTTP response could be associated with the failure.
pub const NO_STATUS: u16 = 0;

const NETWORK_FAILURE: &str = "Network request failed";
const RETRIES_EXHAUSTED: &str = "Request exhausted retries";
const GENERIC_FAILURE: &str = "Request failed";

/// Longest plain-text error body used verbatim as a message.
const MAX_TEXT_MESSAGE_LEN: usize = 512;

/// Normalized API failure.
///
/// Network errors, timeouts, non-2xx responses and exhausted retries all end up
/// here. Branch on [`status`](Self::status) and [`code`](Self::code).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("api error (status {status}): {message}")]
pub struct ApiError {
    /// HTTP status, or [`NO_STATUS`] when no response was received.
    pub status: u16,
    pub message: String,
    /// Machine-readable error code from the response body.
    pub code: Option<String>,
    /// Correlation id, from the `x-request-id` header or the body.
    pub request_id: Option<String>,
    /// The error payload as received: parsed JSON, raw text, or the transport
    /// failure description.
    pub raw: Option<Value>,
    /// Set only when the transport produced no response (network or timeout).
    transport_failure: bool,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            request_id: None,
            raw: None,
            transport_failure: false,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// A request that never produced a response.
    pub(crate) fn network(cause: impl std::fmt::Display) -> Self {
        Self {
            transport_failure: true,
            ..Self::new(NO_STATUS, NETWORK_FAILURE).with_raw(Value::String(cause.to_string()))
        }
    }

    pub(crate) fn exhausted() -> Self {
        Self::new(NO_STATUS, RETRIES_EXHAUSTED)
    }

    /// Build the error for a non-2xx response.
    ///
    /// `reason` is the status reason phrase, `header_request_id` the value of
    /// `x-request-id` if the response carried one.
    pub(crate) fn from_response(
        status: u16,
        reason: Option<&str>,
        header_request_id: Option<String>,
        body: &str,
    ) -> Self {
        let document = ErrorDocument::parse(body);

        let message = document
            .string_field("message")
            .or_else(|| document.string_field("error"))
            .or_else(|| document.text_message())
            .or_else(|| reason.filter(|r| !r.is_empty()).map(ToOwned::to_owned))
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());

        let code = document
            .string_field("code")
            .or_else(|| document.string_field("errorCode"));

        let request_id = header_request_id
            .filter(|id| !id.is_empty())
            .or_else(|| document.string_field("requestId"));

        Self {
            status,
            message,
            code,
            request_id,
            raw: document.into_raw(),
            transport_failure: false,
        }
    }

    /// No HTTP response was received (network failure or timeout).
    ///
    /// Other status-0 errors, such as an undecodable success body or a request
    /// body that failed to serialize, are not network errors.
    pub fn is_network_error(&self) -> bool {
        self.transport_failure
    }

    /// 4xx: the request itself needs fixing.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// 5xx, surfaced after the retry budget was spent.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Loosely structured error body. Known keys are only read when present and
/// holding a string; nothing about the shape is assumed.
enum ErrorDocument {
    Empty,
    Json(Value),
    Text(String),
}

impl ErrorDocument {
    fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body.to_owned()),
        }
    }

    fn string_field(&self, key: &str) -> Option<String> {
        let Self::Json(Value::Object(map)) = self else {
            return None;
        };
        map.get(key)?.as_str().map(ToOwned::to_owned)
    }

    /// Plain-text bodies become the message when short enough to be readable.
    fn text_message(&self) -> Option<String> {
        let text = match self {
            Self::Text(text) => text.trim(),
            Self::Json(Value::String(text)) => text.trim(),
            _ => return None,
        };
        if text.is_empty() || text.len() > MAX_TEXT_MESSAGE_LEN {
            return None;
        }
        Some(text.to_owned())
    }

    fn into_raw(self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(value),
            Self::Text(text) => Some(Value::String(text)),
        }
    }
}
