//! Secret key provisioning configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable read for the key when nothing else is configured.
pub const DEFAULT_SECRET_ENV: &str = "SWIFTTOKEN_SECRET";

/// Where the 32-byte symmetric key is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Environment variable containing the key.
    #[serde(default = "default_secret_env")]
    pub secret_env: Option<String>,

    /// Path to a file containing the key.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
            secret_file: None,
        }
    }
}

impl SecretConfig {
    /// Resolve the raw key text from environment or file.
    ///
    /// The environment variable wins over the file. Returns `Ok(None)` when
    /// neither source is set, and `NotFound` when a configured file is absent.
    pub fn resolve_secret(&self) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.secret_env {
            match std::env::var(env_var) {
                Ok(key) => return Ok(Some(key)),
                Err(std::env::VarError::NotPresent) => {}
                Err(std::env::VarError::NotUnicode(_)) => {
                    tracing::warn!(
                        env_var = %env_var,
                        "secret env var is not valid UTF-8, ignoring"
                    );
                }
            }
        }

        if let Some(path) = &self.secret_file {
            if !path.exists() {
                tracing::warn!(path = %path.display(), "configured secret file does not exist");
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("secret file not found: {}", path.display()),
                ));
            }
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim_end_matches(['\r', '\n']).to_string()));
        }

        Ok(None)
    }
}

fn default_secret_env() -> Option<String> {
    Some(DEFAULT_SECRET_ENV.to_string())
}
