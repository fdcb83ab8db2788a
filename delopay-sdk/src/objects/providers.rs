//! Provider discovery types.

use serde::{Deserialize, Serialize};

/// A payment provider enabled for the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_currencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_crypto: Option<Vec<String>>,
}

/// Response of `GET /api/providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderInfo>,
}

/// Public, client-side configuration of a provider (e.g. a Stripe publishable key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderClientConfig {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Filters for `GET /api/providers/stripe/payment-methods`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripePaymentMethodsQuery {
    /// ISO 3166-1 alpha-2 country of the merchant account.
    pub merchant_country: String,
    /// ISO 3166-1 alpha-2 country of the paying customer.
    pub customer_country: String,
    /// Narrow the result to methods supporting this currency.
    pub currency: Option<String>,
}

impl StripePaymentMethodsQuery {
    pub fn new(merchant_country: impl Into<String>, customer_country: impl Into<String>) -> Self {
        Self {
            merchant_country: merchant_country.into(),
            customer_country: customer_country.into(),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    pub success: bool,
    pub merchant_country: String,
    pub customer_country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub payment_methods: Vec<PaymentMethodDetail>,
}
