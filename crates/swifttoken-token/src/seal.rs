//! Authenticated encryption of opaque byte buffers.
//!
//! Sealed layout: `[nonce (24) | ciphertext | tag (16)]`.
//!
//! XChaCha20-Poly1305 is used for its 192-bit nonce: a fresh random nonce per
//! call makes reuse negligible without a counter, so the layer keeps no state.

use crate::error::{KeyError, SealError};
use crate::keys::{self, KEY_LEN, SecretKey};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::fmt;
use std::sync::Arc;

/// Length of the random nonce prefix.
pub const NONCE_LEN: usize = 24;

/// Length of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;

/// Shortest input [`Sealer::open`] will attempt.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

/// A source of secure random bytes for nonces.
pub trait EntropySource: Send + Sync {
    /// Fill `dest`, returning how many bytes were written.
    fn fill(&self, dest: &mut [u8]) -> Result<usize, String>;
}

/// The operating system's random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<usize, String> {
        OsRng.try_fill_bytes(dest).map_err(|e| e.to_string())?;
        Ok(dest.len())
    }
}

/// Seals and opens byte buffers under one key.
///
/// Knows nothing about payloads. Cheap to clone; clones share the key.
#[derive(Clone)]
pub struct Sealer {
    key: Arc<SecretKey>,
    entropy: Arc<dyn EntropySource>,
}

impl Sealer {
    /// Create a sealer over an explicit key handle.
    pub fn new(key: Arc<SecretKey>) -> Self {
        Self {
            key,
            entropy: Arc::new(OsEntropy),
        }
    }

    /// Create a sealer over the process-wide key.
    pub fn from_installed_key() -> Result<Self, SealError> {
        Ok(Self::new(keys::installed()?))
    }

    /// Replace the nonce source.
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Encrypt and authenticate `plaintext` under a fresh random nonce.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, SealError> {
        let cipher = self.cipher()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        let written = self
            .entropy
            .fill(&mut nonce_bytes)
            .map_err(SealError::Randomness)?;
        if written != NONCE_LEN {
            return Err(SealError::Randomness(format!(
                "entropy source returned {written} of {NONCE_LEN} bytes"
            )));
        }

        let nonce = XNonce::from_slice(&nonce_bytes);
        // Without associated data the only failure is an oversized plaintext.
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| SealError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Verify and decrypt a buffer produced by [`Sealer::seal`].
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, SealError> {
        if sealed.len() < MIN_SEALED_LEN {
            return Err(SealError::MalformedToken {
                len: sealed.len(),
                min: MIN_SEALED_LEN,
            });
        }
        let cipher = self.cipher()?;

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        cipher
            .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| SealError::Authentication)
    }

    fn cipher(&self) -> Result<XChaCha20Poly1305, SealError> {
        let key = self.key.as_bytes();
        XChaCha20Poly1305::new_from_slice(key).map_err(|_| {
            SealError::Key(KeyError::InvalidLength {
                expected: KEY_LEN,
                actual: key.len(),
            })
        })
    }
}

impl fmt::Debug for Sealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealer").finish_non_exhaustive()
    }
}
