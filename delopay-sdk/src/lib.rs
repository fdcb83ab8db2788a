//! Typed async client for the Delopay payments API.
//!
//! ```ignore
//! use delopay_sdk::{ClientConfig, DelopayClient};
//!
//! let client = DelopayClient::new(ClientConfig::new("sk_test_123"))?;
//! let payment = client.payments().get("pay_123").await?;
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod objects;

pub use client::{ApiError, DelopayClient};
pub use config::{ClientConfig, ConfigError};
