//! HTTP client for the Delopay API.
//!
//! [`DelopayClient`] owns one [`HttpClient`] and exposes the resource clients
//! built on it. The default `reqwest` transport is gated behind the `client`
//! cargo feature; any [`Transport`] can be injected instead.

mod error;
mod http;
mod payments;
mod providers;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{ApiError, NO_STATUS};
pub use http::{ApiRequest, HttpClient, QueryValue, REQUEST_ID_HEADER, backoff, encode_segment};
pub use payments::PaymentsClient;
pub use providers::ProvidersClient;
#[cfg(feature = "client")]
pub use transport::ReqwestTransport;
pub use transport::{Method, Transport, TransportError, TransportRequest, TransportResponse};

use std::sync::Arc;

use crate::config::{ClientConfig, ConfigError};

/// Entry point of the SDK.
///
/// Cloning is cheap and clones share the same configuration and transport.
#[derive(Debug, Clone)]
pub struct DelopayClient {
    payments: PaymentsClient,
    providers: ProvidersClient,
}

impl DelopayClient {
    /// Create a client using the default `reqwest` transport.
    ///
    /// Fails without touching the network if the configuration is invalid,
    /// e.g. when the API key is blank.
    #[cfg(feature = "client")]
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let http = HttpClient::new(config.validate()?, transport);
        Ok(Self {
            payments: PaymentsClient::new(http.clone()),
            providers: ProvidersClient::new(http),
        })
    }

    pub fn payments(&self) -> &PaymentsClient {
        &self.payments
    }

    pub fn providers(&self) -> &ProvidersClient {
        &self.providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock::MockTransport;
    use serde_json::json;

    #[test]
    fn test_blank_api_key_fails_before_any_request() {
        let transport = MockTransport::new();
        let result = DelopayClient::with_transport(ClientConfig::new("  "), transport.clone());
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_authorization_header() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({
                "paymentId": "pay_123",
                "clientOrderId": "order_1",
                "provider": "STRIPE",
                "status": "PENDING",
                "amount": 10,
                "currency": "EUR"
            }),
        );
        let config = ClientConfig::new("test_key").with_base_url("https://api.example.com");
        let client = DelopayClient::with_transport(config, transport.clone()).unwrap();

        client.payments().get("pay_123").await.unwrap();

        assert_eq!(transport.attempts(), 1);
        let request = transport.request(0);
        assert!(request.url.as_str().contains("/api/payments/pay_123"));
        assert_eq!(request.header("Authorization"), Some("Bearer test_key"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_facades_share_configuration() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({ "providers": [] }));
        transport.push_json(200, json!({ "resent": 0 }));
        let config = ClientConfig::new("shared_key").with_base_url("https://api.example.com/v/");
        let client = DelopayClient::with_transport(config, transport.clone()).unwrap();

        client.providers().list().await.unwrap();
        client.payments().resend_failed_callbacks().await.unwrap();

        for index in 0..2 {
            let request = transport.request(index);
            assert!(request.url.as_str().starts_with("https://api.example.com/v/api/"));
            assert_eq!(request.header("authorization"), Some("Bearer shared_key"));
        }
    }
}
