//! TOML file configuration structures.
//!
//! These structs directly map to the `delopay.toml` file format.

use delopay_sdk::config::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSection,
}

/// `[client]` section.
///
/// Unknown keys are rejected, so a misspelled option (e.g. `timeout` instead
/// of `timeout_ms`) fails loudly instead of silently falling back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// API key. Usually supplied through `DELOPAY_API_KEY` instead.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[client]
api_key = "sk_test_123"
base_url = "https://api.delopay.test"
timeout_ms = 5000
max_retries = 4
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.client.api_key.as_deref(), Some("sk_test_123"));
        assert_eq!(config.client.base_url, "https://api.delopay.test");
        assert_eq!(config.client.timeout_ms, 5000);
        assert_eq!(config.client.max_retries, 4);
    }

    #[test]
    fn test_defaults_when_empty() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.client.api_key.is_none());
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout_ms, 30_000);
        assert_eq!(config.client.max_retries, 2);
    }

    #[test]
    fn test_unknown_timeout_name_is_rejected() {
        let toml_str = r#"
[client]
timeout = 5000
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }
}
