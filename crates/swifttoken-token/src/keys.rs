//! Symmetric key handling.
//!
//! The key is loaded once at startup and shared read-only afterwards. It can be
//! passed explicitly (`Arc<SecretKey>`) or published in the process-wide slot
//! with [`install`] before any concurrent use begins.

use crate::error::KeyError;
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use swifttoken_core::SecretConfig;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the symmetric key in bytes.
pub const KEY_LEN: usize = 32;

static PROCESS_KEY: OnceLock<Arc<SecretKey>> = OnceLock::new();

/// A 32-byte symmetric key. Wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_LEN],
}

impl SecretKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Use exactly 32 bytes of key material. Never pads or truncates.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Parse key text.
    ///
    /// Accepts either exactly 32 raw bytes of text or standard base64 that
    /// decodes to 32 bytes.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        if text.is_empty() {
            return Err(KeyError::Missing);
        }
        if text.len() == KEY_LEN {
            return Self::from_bytes(text.as_bytes());
        }

        match general_purpose::STANDARD.decode(text.trim()) {
            Ok(mut decoded) => {
                let key = Self::from_bytes(&decoded);
                decoded.zeroize();
                key
            }
            Err(_) => Err(KeyError::InvalidLength {
                expected: KEY_LEN,
                actual: text.len(),
            }),
        }
    }

    /// Load a key from a file containing key text.
    pub fn load_from_file(path: &Path) -> Result<Self, KeyError> {
        let mut text = std::fs::read_to_string(path)?;
        let key = Self::parse(text.trim_end_matches(['\r', '\n']));
        text.zeroize();
        key
    }

    /// Load the key described by a [`SecretConfig`].
    pub fn from_config(config: &SecretConfig) -> Result<Self, KeyError> {
        let mut text = config.resolve_secret()?.ok_or(KeyError::Missing)?;
        let key = Self::parse(&text);
        text.zeroize();
        key
    }

    /// Encode the key as standard base64.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Publish the process-wide key. Only the first call succeeds.
pub fn install(key: SecretKey) -> Result<Arc<SecretKey>, KeyError> {
    let key = Arc::new(key);
    PROCESS_KEY
        .set(Arc::clone(&key))
        .map_err(|_| KeyError::AlreadyInstalled)?;
    tracing::debug!("process-wide secret key installed");
    Ok(key)
}

/// The process-wide key, if one was installed.
pub fn installed() -> Result<Arc<SecretKey>, KeyError> {
    PROCESS_KEY.get().cloned().ok_or(KeyError::Missing)
}
