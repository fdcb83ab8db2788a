//! Client configuration.
//!
//! [`ClientConfig`] holds the options a caller sets; [`ClientConfig::validate`]
//! turns them into the immutable [`TransportConfig`] shared by every call. The
//! CLI crate handles loading these values from files and the environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API endpoint (sandbox).
pub const DEFAULT_BASE_URL: &str = "https://sandbox-delopay.deloxity.com";

/// Default per-attempt timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default number of extra attempts for idempotent requests.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Errors raised while building a client, before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api_key is required")]
    MissingApiKey,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base url must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("base url `{0}` cannot carry a path")]
    CannotBeABase(String),

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Options recognized when constructing a [`DelopayClient`](crate::DelopayClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Root URL of the API. A trailing slash is optional.
    pub base_url: String,
    /// Per-attempt wall-clock budget in milliseconds.
    pub timeout_ms: u64,
    /// Extra attempts for GET/HEAD requests. Other methods never retry.
    pub max_retries: u32,
}

impl ClientConfig {
    /// Create a configuration with the default endpoint, timeout and retry bound.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Check the options and produce the immutable transport configuration.
    pub fn validate(&self) -> Result<TransportConfig, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(TransportConfig {
            api_key: self.api_key.clone(),
            base_url: normalize_base_url(&self.base_url)?,
            timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Validated, read-only configuration shared by all calls of one client.
#[derive(Clone)]
pub struct TransportConfig {
    pub api_key: String,
    /// Always ends with exactly one `/`.
    pub base_url: Url,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Parse `raw` and force its path to end with exactly one `/`, so relative
/// paths resolve beneath it instead of replacing its last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/"))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::CannotBeABase(raw.to_owned()));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("sk_test").validate().unwrap();
        assert_eq!(config.base_url.as_str(), "https://sandbox-delopay.deloxity.com/");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(matches!(
            ClientConfig::new("").validate(),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            ClientConfig::new("   ").validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ClientConfig::new("sk_test").with_timeout_ms(0).validate();
        assert!(matches!(result, Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_base_url_normalization_is_idempotent() {
        let with_slash = normalize_base_url("https://api.test.com/").unwrap();
        let without_slash = normalize_base_url("https://api.test.com").unwrap();
        let many_slashes = normalize_base_url("https://api.test.com///").unwrap();
        assert_eq!(with_slash, without_slash);
        assert_eq!(with_slash, many_slashes);
        assert_eq!(with_slash.as_str(), "https://api.test.com/");

        let prefixed = normalize_base_url("https://proxy.test.com/delopay").unwrap();
        assert_eq!(prefixed.as_str(), "https://proxy.test.com/delopay/");
    }

    #[test]
    fn test_invalid_base_urls() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("ftp://files.test.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("sk_live_secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk_live_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
