//! Providers API client.

use super::ApiError;
use super::http::{ApiRequest, HttpClient, encode_segment};
use crate::objects::{
    PaymentMethodsResponse, ProviderClientConfig, ProviderListResponse, StripePaymentMethodsQuery,
};

/// Typed client for the `/api/providers` endpoints. All calls are GETs and
/// therefore retried on transient failures. An empty 2xx body yields `Ok(None)`.
#[derive(Debug, Clone)]
pub struct ProvidersClient {
    http: HttpClient,
}

impl ProvidersClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /api/providers`: list providers configured for the merchant.
    pub async fn list(&self) -> Result<Option<ProviderListResponse>, ApiError> {
        self.http.execute(ApiRequest::get("/api/providers")).await
    }

    /// `GET /api/providers/{provider_id}/client-config`: public keys the
    /// checkout frontend needs to initialize the provider's SDK.
    pub async fn get_client_config(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderClientConfig>, ApiError> {
        let request = ApiRequest::get(format!(
            "/api/providers/{}/client-config",
            encode_segment(provider_id)
        ));
        self.http.execute(request).await
    }

    /// `GET /api/providers/stripe/payment-methods`: Stripe payment methods
    /// available for a merchant/customer country pair.
    pub async fn get_stripe_payment_methods(
        &self,
        params: &StripePaymentMethodsQuery,
    ) -> Result<Option<PaymentMethodsResponse>, ApiError> {
        let request = ApiRequest::get("/api/providers/stripe/payment-methods")
            .query("merchantCountry", Some(&params.merchant_country))
            .query("customerCountry", Some(&params.customer_country))
            .query("currency", params.currency.as_ref());
        self.http.execute(request).await
    }
}
