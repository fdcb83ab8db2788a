//! Payments API client.

use super::ApiError;
use super::http::{ApiRequest, HttpClient, encode_segment};
use crate::objects::{
    CreatePaymentRequest, PaymentResponse, RefundPaymentRequest, RefundResponse,
    ResendCallbacksResponse, UpdatePaymentRequest,
};

/// Typed client for the `/api/payments` endpoints.
///
/// Only [`get`](Self::get) and [`get_by_order`](Self::get_by_order) are
/// retried on failure; every other call is attempted exactly once.
///
/// Every method yields `Ok(None)` when the server answers 204 or with an empty
/// body. For `capture` and `refund` that still means the call succeeded.
#[derive(Debug, Clone)]
pub struct PaymentsClient {
    http: HttpClient,
}

impl PaymentsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `POST /api/payments/create`: create a payment and obtain its checkout URL.
    pub async fn create(
        &self,
        input: &CreatePaymentRequest,
    ) -> Result<Option<PaymentResponse>, ApiError> {
        let request = ApiRequest::post("/api/payments/create").json(input)?;
        self.http.execute(request).await
    }

    /// `GET /api/payments/{payment_id}`
    pub async fn get(&self, payment_id: &str) -> Result<Option<PaymentResponse>, ApiError> {
        let request = ApiRequest::get(format!("/api/payments/{}", encode_segment(payment_id)));
        self.http.execute(request).await
    }

    /// `GET /api/payments/by-order/{client_order_id}`: look a payment up by
    /// the merchant's own order id.
    pub async fn get_by_order(
        &self,
        client_order_id: &str,
    ) -> Result<Option<PaymentResponse>, ApiError> {
        let request = ApiRequest::get(format!(
            "/api/payments/by-order/{}",
            encode_segment(client_order_id)
        ));
        self.http.execute(request).await
    }

    /// `PUT /api/payments/{payment_id}`
    pub async fn update(
        &self,
        payment_id: &str,
        input: &UpdatePaymentRequest,
    ) -> Result<Option<PaymentResponse>, ApiError> {
        let request = ApiRequest::put(format!("/api/payments/{}", encode_segment(payment_id)))
            .json(input)?;
        self.http.execute(request).await
    }

    /// `POST /api/payments/{payment_id}/capture`: capture an authorized payment.
    pub async fn capture(&self, payment_id: &str) -> Result<Option<PaymentResponse>, ApiError> {
        let request = ApiRequest::post(format!(
            "/api/payments/{}/capture",
            encode_segment(payment_id)
        ));
        self.http.execute(request).await
    }

    /// `POST /api/payments/{payment_id}/refund`: refund all or part of a payment.
    pub async fn refund(
        &self,
        payment_id: &str,
        input: &RefundPaymentRequest,
    ) -> Result<Option<RefundResponse>, ApiError> {
        let request = ApiRequest::post(format!(
            "/api/payments/{}/refund",
            encode_segment(payment_id)
        ))
        .json(input)?;
        self.http.execute(request).await
    }

    /// `POST /api/payments/resend-failed-callbacks`: requeue callbacks that
    /// could not be delivered.
    pub async fn resend_failed_callbacks(
        &self,
    ) -> Result<Option<ResendCallbacksResponse>, ApiError> {
        let request = ApiRequest::post("/api/payments/resend-failed-callbacks");
        self.http.execute(request).await
    }
}
