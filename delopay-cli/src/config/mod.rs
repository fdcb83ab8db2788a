//! Configuration module for the delopay CLI.
//!
//! Merges the optional TOML file with command-line flags and environment
//! variables, then hands the result to the SDK for validation.

pub mod file;

use crate::config::file::FileConfig;
use delopay_sdk::ClientConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when `--config` is not given. It may be absent.
pub const DEFAULT_CONFIG_PATH: &str = "./delopay.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid client configuration: {0}")]
    ClientError(#[from] delopay_sdk::ConfigError),
}

/// Values from flags or the environment. Set values win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    /// Whether the path was chosen by the user, in which case it must exist.
    explicit: bool,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader. `config_path` of `None` means the default
    /// path, which is allowed to be missing.
    pub fn new(config_path: Option<&Path>, overrides: Overrides) -> Self {
        match config_path {
            Some(path) => Self {
                config_path: path.to_path_buf(),
                explicit: true,
                overrides,
            },
            None => Self {
                config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
                explicit: false,
                overrides,
            },
        }
    }

    /// Load the file, apply overrides and validate the result.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let file_config = self.read_file()?;
        let config = self.merge(file_config);
        config.validate()?;
        Ok(config)
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => {
                tracing::debug!("Configuration loaded from {:?}", self.config_path);
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.explicit => {
                tracing::debug!("No config file at {:?}, using defaults", self.config_path);
                Ok(FileConfig::default())
            }
            Err(source) => Err(ConfigError::IoError {
                path: self.config_path.clone(),
                source,
            }),
        }
    }

    fn merge(&self, file_config: FileConfig) -> ClientConfig {
        let section = file_config.client;
        let overrides = self.overrides.clone();

        ClientConfig::new(overrides.api_key.or(section.api_key).unwrap_or_default())
            .with_base_url(overrides.base_url.unwrap_or(section.base_url))
            .with_timeout_ms(overrides.timeout_ms.unwrap_or(section.timeout_ms))
            .with_max_retries(overrides.max_retries.unwrap_or(section.max_retries))
    }
}
