//! Payment request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Metadata, open_string_enum};

/// Payment provider a payment is routed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentProvider {
    Stripe,
    Paypal,
    NowPayments,
    Paysafe,
    /// A provider this SDK version does not know about yet.
    Other(String),
}

open_string_enum!(PaymentProvider {
    Stripe => "STRIPE",
    Paypal => "PAYPAL",
    NowPayments => "NOWPAYMENTS",
    Paysafe => "PAYSAFE",
});

/// Lifecycle status of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Authorized,
    Completed,
    Failed,
    Canceled,
    Refunded,
    /// A status this SDK version does not know about yet.
    Other(String),
}

open_string_enum!(PaymentStatus {
    Pending => "PENDING",
    Authorized => "AUTHORIZED",
    Completed => "COMPLETED",
    Failed => "FAILED",
    Canceled => "CANCELED",
    Refunded => "REFUNDED",
});

/// Request body for `POST /api/payments/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Merchant-side order identifier.
    pub client_order_id: String,
    pub provider: PaymentProvider,
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Where the customer lands after a successful checkout.
    pub success_url: String,
    /// Where the customer lands after abandoning checkout.
    pub cancel_url: String,
    /// Server-to-server status callback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Capture immediately after authorization. Provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_capture: Option<bool>,
}

impl CreatePaymentRequest {
    /// Build a request with all required fields and no optional ones.
    pub fn new(
        client_order_id: impl Into<String>,
        provider: PaymentProvider,
        amount: Decimal,
        currency: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            client_order_id: client_order_id.into(),
            provider,
            amount,
            currency: currency.into(),
            description: None,
            customer_email: None,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            callback_url: None,
            metadata: None,
            auto_capture: None,
        }
    }
}

/// Request body for `PUT /api/payments/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

/// Payment as returned by every payment endpoint except refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub client_order_id: String,
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Hosted checkout page to redirect the customer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub expires_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Response of `POST /api/payments/resend-failed-callbacks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendCallbacksResponse {
    /// Number of callbacks queued for redelivery.
    pub resent: u64,
}
