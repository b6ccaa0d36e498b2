//! Error types for sealing and the token protocol.

use swifttoken_core::PayloadViolation;
use thiserror::Error;

/// Errors from loading or publishing the symmetric key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No key was provided or installed.
    #[error("secret key is not configured")]
    Missing,

    /// Key material has the wrong size.
    #[error("secret key must be exactly {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The process-wide key was already published.
    #[error("a process-wide secret key is already installed")]
    AlreadyInstalled,

    /// IO error (reading key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the sealing layer.
#[derive(Debug, Error)]
pub enum SealError {
    /// Key unusable by the cipher.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The entropy source did not produce a full nonce.
    #[error("failed to generate nonce: {0}")]
    Randomness(String),

    /// Input is too short to hold a nonce and a tag.
    #[error("sealed data is {len} bytes, need at least {min}")]
    MalformedToken { len: usize, min: usize },

    /// The plaintext could not be encrypted.
    #[error("encryption failed")]
    Encryption,

    /// The tag did not verify. Corruption and tampering look the same.
    #[error("authentication failed")]
    Authentication,
}

/// Errors from the payload codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(String),

    /// Bytes are not a well-formed payload for this codec.
    #[error("failed to decode payload: {0}")]
    Decode(String),
}

/// Errors from issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The payload breaks a field rule.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] PayloadViolation),

    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encoding(String),

    /// The opened token did not deserialize into a payload.
    #[error("failed to decode payload: {0}")]
    Decoding(String),

    /// The key is missing or malformed.
    #[error(transparent)]
    Key(KeyError),

    /// The entropy source failed.
    #[error("failed to generate nonce: {0}")]
    Randomness(String),

    /// The token could not be opened.
    ///
    /// Short input, bad text encoding and tag mismatch all end up here.
    #[error("failed to decrypt token")]
    Decryption,

    /// The current time is outside `[issued_at, expires_at]`.
    #[error("token is in future or expired (now {now}, valid {issued_at}..={expires_at})")]
    ExpiredOrFuture {
        now: i64,
        issued_at: i64,
        expires_at: i64,
    },
}

impl TokenError {
    /// Whether this is a temporal rejection.
    pub fn is_expired_or_future(&self) -> bool {
        matches!(self, Self::ExpiredOrFuture { .. })
    }
}
