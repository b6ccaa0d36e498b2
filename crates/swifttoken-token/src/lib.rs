//! # swifttoken-token
//!
//! Compact, encrypted, tamper-evident session tokens.
//!
//! A token is a [`Payload`] serialized by a [`PayloadCodec`] and sealed with
//! XChaCha20-Poly1305 under a process-wide 32-byte key:
//!
//! ```text
//! [ 24-byte random nonce | ciphertext | 16-byte tag ]
//! ```
//!
//! The bytes are opaque. Verification needs only the token and the same key,
//! and nothing is stored between calls.
//!
//! ## Verification outcomes
//!
//! | Outcome | Result |
//! |---------|--------|
//! | Accepted | `Ok(VerifiedToken { refresh: false, .. })` |
//! | Accepted, renew soon | `Ok(VerifiedToken { refresh: true, .. })` |
//! | Rejected | `Err(TokenError::..)` |
//!
//! A sliding token asks for renewal once `expires_at - now` is at most the
//! sliding window (15 minutes by default). Both validity bounds are inclusive.

pub mod clock;
pub mod codec;
pub mod error;
pub mod keys;
pub mod seal;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{BincodeCodec, JsonCodec, PayloadCodec, codec_for};
pub use error::{CodecError, KeyError, SealError, TokenError};
pub use keys::SecretKey;
pub use seal::{EntropySource, OsEntropy, Sealer};
pub use swifttoken_core::Payload;
pub use token::{
    DEFAULT_SLIDING_WINDOW_SECS, TokenIssuer, TokenVerifier, VerifiedToken, decode_token,
    encode_token,
};
