//! CLI command implementations for SwiftToken.

pub mod keys;
pub mod token;

use anyhow::Context;
use std::path::{Path, PathBuf};
use swifttoken_core::SwiftTokenConfig;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "swifttoken.yaml";

/// Load the configuration from `path`, or from `swifttoken.yaml` if present.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SwiftTokenConfig> {
    if let Some(path) = path {
        return SwiftTokenConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        tracing::debug!(path = %default_path.display(), "using config from working directory");
        return SwiftTokenConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    tracing::warn!(
        path = DEFAULT_CONFIG_FILE,
        "no config file found, using built-in defaults"
    );
    Ok(SwiftTokenConfig::default())
}
