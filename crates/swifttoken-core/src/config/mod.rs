//! Configuration types for SwiftToken.
//!
//! A single YAML file (conventionally `swifttoken.yaml`) with two sections:
//!
//! ```yaml
//! secret:
//!   secret_env: SWIFTTOKEN_SECRET
//!   secret_file: /run/secrets/swifttoken.key
//! token:
//!   sliding_window_secs: 900
//!   default_lifetime_secs: 1800
//!   codec: bincode
//! ```
//!
//! Both sections are optional; missing values fall back to defaults.

pub mod secret;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use secret::SecretConfig;
pub use token::{CodecKind, TokenConfig};

/// Complete SwiftToken configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwiftTokenConfig {
    /// Where the symmetric key comes from.
    #[serde(default)]
    pub secret: SecretConfig,

    /// Token lifetime and renewal policy.
    #[serde(default)]
    pub token: TokenConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwiftTokenConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the token protocol cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.sliding_window_secs < 0 {
            return Err(ConfigError::Config(
                "token.sliding_window_secs must not be negative".into(),
            ));
        }
        if self.token.default_lifetime_secs <= 0 {
            return Err(ConfigError::Config(
                "token.default_lifetime_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
