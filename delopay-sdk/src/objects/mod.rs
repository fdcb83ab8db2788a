//! Request and response types exchanged with the Delopay API.
//!
//! All types use camelCase JSON. Optional fields are omitted from request
//! bodies when unset and tolerated as missing in responses.

/// Free-form metadata attached to a payment.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Implements `From<String>`, `Into<String>` and `Display` for an enum of known
/// wire values with an `Other(String)` fallback, so unknown values survive a
/// round trip.
macro_rules! open_string_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }

        impl $name {
            /// The wire representation of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use open_string_enum;

pub mod payments;
pub mod providers;
pub mod refunds;

pub use payments::{
    CreatePaymentRequest, PaymentProvider, PaymentResponse, PaymentStatus,
    ResendCallbacksResponse, UpdatePaymentRequest,
};
pub use providers::{
    PaymentMethodDetail, PaymentMethodsResponse, ProviderClientConfig, ProviderInfo,
    ProviderListResponse, StripePaymentMethodsQuery,
};
pub use refunds::{RefundPaymentRequest, RefundResponse};
