//! Scripted [`Transport`] for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use super::transport::{Transport, TransportError, TransportRequest, TransportResponse};

enum Step {
    Respond(TransportResponse),
    Fail(TransportError),
    /// Never completes; only the caller's deadline ends the attempt.
    Hang,
}

/// Replays queued outcomes in order and records every request it receives.
#[derive(Default)]
pub(crate) struct MockTransport {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, step: Step) {
        self.script.lock().unwrap().push_back(step);
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_json_with_headers(status, body, &[]);
    }

    pub(crate) fn push_json_with_headers(&self, status: u16, body: Value, headers: &[(&str, &str)]) {
        let mut all = vec![("content-type".to_string(), "application/json".to_string())];
        all.extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self.push(Step::Respond(TransportResponse {
            status,
            reason: None,
            headers: all,
            body: Bytes::from(body.to_string()),
        }));
    }

    pub(crate) fn push_text(&self, status: u16, body: &str) {
        self.push(Step::Respond(TransportResponse {
            status,
            reason: None,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Bytes::from(body.to_owned()),
        }));
    }

    pub(crate) fn push_error(&self, error: TransportError) {
        self.push(Step::Fail(error));
    }

    pub(crate) fn push_hang(&self) {
        self.push(Step::Hang);
    }

    pub(crate) fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn request(&self, index: usize) -> TransportRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub(crate) fn body_json(&self, index: usize) -> Value {
        let body = self.request(index).body.expect("request has no body");
        serde_json::from_slice(&body).unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: TransportRequest,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportError::Request("mock script exhausted".into())),
        }
    }
}
