//! Token issuance and verification.

use crate::clock::{Clock, SystemClock};
use crate::codec::{BincodeCodec, PayloadCodec, codec_for};
use crate::error::{SealError, TokenError};
use crate::seal::Sealer;
use base64::{Engine as _, engine::general_purpose};
use std::sync::Arc;
use swifttoken_core::{Payload, TokenConfig};

pub use swifttoken_core::config::token::DEFAULT_SLIDING_WINDOW_SECS;

/// Encode sealed bytes as URL-safe base64 without padding.
pub fn encode_token(token: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

/// Decode a token string produced by [`encode_token`].
///
/// Any malformed text is reported as [`TokenError::Decryption`].
pub fn decode_token(token: &str) -> Result<Vec<u8>, TokenError> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| {
            tracing::debug!(reason = %e, "token rejected: not base64");
            TokenError::Decryption
        })
}

/// Creates sealed tokens from payloads.
#[derive(Clone)]
pub struct TokenIssuer {
    sealer: Sealer,
    codec: Arc<dyn PayloadCodec>,
}

impl TokenIssuer {
    /// Create an issuer using the default binary codec.
    pub fn new(sealer: Sealer) -> Self {
        Self {
            sealer,
            codec: Arc::new(BincodeCodec),
        }
    }

    /// Create an issuer from the token section of the configuration.
    pub fn from_config(sealer: Sealer, config: &TokenConfig) -> Self {
        Self::new(sealer).with_codec(codec_for(config.codec))
    }

    /// Replace the payload codec.
    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Validate, serialize and seal `payload`.
    pub fn issue(&self, payload: &Payload) -> Result<Vec<u8>, TokenError> {
        payload.validate()?;

        let encoded = self
            .codec
            .encode(payload)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let token = self.sealer.seal(&encoded).map_err(|e| match e {
            SealError::Key(key) => TokenError::Key(key),
            SealError::Randomness(reason) => TokenError::Randomness(reason),
            SealError::Encryption
            | SealError::MalformedToken { .. }
            | SealError::Authentication => TokenError::Encoding(e.to_string()),
        })?;

        tracing::debug!(
            session_id = %payload.session_id,
            expires_at = payload.expires_at,
            sliding = payload.sliding,
            codec = self.codec.name(),
            "token issued"
        );
        Ok(token)
    }

    /// Issue a token as a URL-safe string.
    pub fn issue_string(&self, payload: &Payload) -> Result<String, TokenError> {
        self.issue(payload).map(|token| encode_token(&token))
    }

    /// Issue a replacement for a verified token, valid from `now`.
    pub fn renew(
        &self,
        verified: &VerifiedToken,
        now: i64,
        lifetime_secs: i64,
    ) -> Result<Vec<u8>, TokenError> {
        self.issue(&verified.payload.renewed(now, lifetime_secs))
    }
}

/// Opens and checks sealed tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    sealer: Sealer,
    codec: Arc<dyn PayloadCodec>,
    clock: Arc<dyn Clock>,
    sliding_window_secs: i64,
}

impl TokenVerifier {
    /// Create a verifier using the system clock, the default binary codec and
    /// a 15 minute sliding window.
    pub fn new(sealer: Sealer) -> Self {
        Self {
            sealer,
            codec: Arc::new(BincodeCodec),
            clock: Arc::new(SystemClock),
            sliding_window_secs: DEFAULT_SLIDING_WINDOW_SECS,
        }
    }

    /// Create a verifier from the token section of the configuration.
    pub fn from_config(sealer: Sealer, config: &TokenConfig) -> Self {
        Self::new(sealer)
            .with_codec(codec_for(config.codec))
            .with_sliding_window(config.sliding_window_secs)
    }

    /// Replace the payload codec.
    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the renewal window in seconds. Negative values are clamped to zero.
    pub fn with_sliding_window(mut self, secs: i64) -> Self {
        self.sliding_window_secs = secs.max(0);
        self
    }

    pub fn sliding_window_secs(&self) -> i64 {
        self.sliding_window_secs
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &[u8]) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify a token string produced by [`TokenIssuer::issue_string`].
    pub fn verify_str(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify(&decode_token(token)?)
    }

    /// Verify a token as of `now` (Unix seconds).
    pub fn verify_at(&self, token: &[u8], now: i64) -> Result<VerifiedToken, TokenError> {
        let plaintext = self.sealer.open(token).map_err(|e| match e {
            SealError::Key(key) => TokenError::Key(key),
            other => {
                tracing::debug!(reason = %other, "token rejected: cannot open");
                TokenError::Decryption
            }
        })?;

        let payload = self.codec.decode(&plaintext).map_err(|e| {
            tracing::debug!(error = %e, codec = self.codec.name(), "token rejected: undecodable");
            TokenError::Decoding(e.to_string())
        })?;

        if let Err(violation) = payload.validate() {
            tracing::debug!(%violation, "token rejected: invalid payload");
            return Err(TokenError::InvalidPayload(violation));
        }

        if now < payload.issued_at || now > payload.expires_at {
            tracing::debug!(
                now,
                issued_at = payload.issued_at,
                expires_at = payload.expires_at,
                "token rejected: outside validity window"
            );
            return Err(TokenError::ExpiredOrFuture {
                now,
                issued_at: payload.issued_at,
                expires_at: payload.expires_at,
            });
        }

        let refresh =
            payload.sliding && payload.remaining_secs(now) <= self.sliding_window_secs;

        tracing::debug!(session_id = %payload.session_id, refresh, "token verified");
        Ok(VerifiedToken { payload, refresh })
    }
}

/// A token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The decoded claims.
    pub payload: Payload,
    /// Advisory: the holder should be issued a replacement soon.
    pub refresh: bool,
}

impl VerifiedToken {
    pub fn needs_refresh(&self) -> bool {
        self.refresh
    }

    pub fn into_parts(self) -> (Payload, bool) {
        (self.payload, self.refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::codec::JsonCodec;
    use crate::keys::SecretKey;
    use crate::seal::EntropySource;
    use swifttoken_core::PayloadViolation;

    const T: i64 = 1_700_000_000;

    fn pair(now: i64) -> (TokenIssuer, TokenVerifier) {
        let sealer = Sealer::new(Arc::new(SecretKey::generate()));
        let issuer = TokenIssuer::new(sealer.clone());
        let verifier = TokenVerifier::new(sealer).with_clock(Arc::new(FixedClock::new(now)));
        (issuer, verifier)
    }

    fn payload(sliding: bool, lifetime: i64) -> Payload {
        Payload::new("user123", "sess1", "abc123", T, lifetime)
            .with_permissions(["read", "write"])
            .sliding(sliding)
    }

    #[test]
    fn test_issue_and_verify() {
        let (issuer, verifier) = pair(T + 10);
        let token = issuer.issue(&payload(false, 1800)).unwrap();

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.payload, payload(false, 1800));
        assert!(!verified.needs_refresh());
    }

    #[test]
    fn test_sliding_near_expiry_requests_refresh() {
        let (issuer, verifier) = pair(T + 1750);
        let token = issuer.issue(&payload(true, 1800)).unwrap();

        let (decoded, refresh) = verifier.verify(&token).unwrap().into_parts();
        assert_eq!(decoded.subject, "user123");
        assert!(refresh);
    }

    #[test]
    fn test_non_sliding_never_requests_refresh() {
        let (issuer, verifier) = pair(T + 1799);
        let token = issuer.issue(&payload(false, 1800)).unwrap();
        assert!(!verifier.verify(&token).unwrap().refresh);
    }

    #[test]
    fn test_invalid_payload_is_not_issued() {
        let (issuer, _) = pair(T);
        let mut p = payload(false, 1800);
        p.permissions.clear();

        let err = issuer.issue(&p).unwrap_err();
        assert!(matches!(
            err,
            TokenError::InvalidPayload(PayloadViolation::NoPermissions)
        ));
    }

    struct ShortEntropy;

    impl EntropySource for ShortEntropy {
        fn fill(&self, dest: &mut [u8]) -> Result<usize, String> {
            Ok(dest.len() / 2)
        }
    }

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&self, _dest: &mut [u8]) -> Result<usize, String> {
            Err("entropy device unavailable".to_string())
        }
    }

    #[test]
    fn test_entropy_failure_surfaces_as_randomness_error() {
        let key = Arc::new(SecretKey::generate());

        let broken =
            TokenIssuer::new(Sealer::new(key.clone()).with_entropy(Arc::new(BrokenEntropy)));
        match broken.issue(&payload(false, 1800)) {
            Err(TokenError::Randomness(reason)) => {
                assert_eq!(reason, "entropy device unavailable")
            }
            other => panic!("expected randomness error, got {other:?}"),
        }

        let short = TokenIssuer::new(Sealer::new(key).with_entropy(Arc::new(ShortEntropy)));
        assert!(matches!(
            short.issue(&payload(false, 1800)),
            Err(TokenError::Randomness(_))
        ));
    }

    #[test]
    fn test_negative_sliding_window_is_clamped() {
        let (issuer, verifier) = pair(T + 1800);
        let verifier = verifier.with_sliding_window(-60);
        assert_eq!(verifier.sliding_window_secs(), 0);

        let token = issuer.issue(&payload(true, 1800)).unwrap();
        assert!(verifier.verify(&token).unwrap().refresh);
    }

    #[test]
    fn test_codec_mismatch_is_decoding_error() {
        let sealer = Sealer::new(Arc::new(SecretKey::generate()));
        let issuer = TokenIssuer::new(sealer.clone()).with_codec(Arc::new(JsonCodec));
        let verifier = TokenVerifier::new(sealer).with_clock(Arc::new(FixedClock::new(T)));

        let token = issuer.issue(&payload(false, 1800)).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(TokenError::Decoding(_))
        ));
    }

    #[test]
    fn test_sealed_invalid_payload_is_rejected_after_open() {
        let sealer = Sealer::new(Arc::new(SecretKey::generate()));
        let verifier =
            TokenVerifier::new(sealer.clone()).with_clock(Arc::new(FixedClock::new(T)));

        let mut p = payload(false, 1800);
        p.subject.clear();
        let encoded = BincodeCodec.encode(&p).unwrap();
        let token = sealer.seal(&encoded).unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(TokenError::InvalidPayload(PayloadViolation::EmptySubject))
        ));
    }

    #[test]
    fn test_short_and_tampered_tokens_look_the_same() {
        let (issuer, verifier) = pair(T);
        let mut token = issuer.issue(&payload(false, 1800)).unwrap();
        token[5] ^= 0xFF;

        let tampered = verifier.verify(&token).unwrap_err();
        let short = verifier.verify(&token[..10]).unwrap_err();
        assert!(matches!(tampered, TokenError::Decryption));
        assert!(matches!(short, TokenError::Decryption));
        assert_eq!(tampered.to_string(), short.to_string());
    }

    #[test]
    fn test_string_form() {
        let (issuer, verifier) = pair(T);
        let token = issuer.issue_string(&payload(false, 1800)).unwrap();
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));

        let verified = verifier.verify_str(&token).unwrap();
        assert_eq!(verified.payload.session_id, "sess1");

        assert!(matches!(
            verifier.verify_str("not base64!"),
            Err(TokenError::Decryption)
        ));
    }

    #[test]
    fn test_renew_produces_fresh_window() {
        let (issuer, verifier) = pair(T + 1750);
        let token = issuer.issue(&payload(true, 1800)).unwrap();
        let verified = verifier.verify(&token).unwrap();
        assert!(verified.refresh);

        let renewed = issuer.renew(&verified, T + 1750, 1800).unwrap();
        let again = verifier.verify(&renewed).unwrap();
        assert_eq!(again.payload.issued_at, T + 1750);
        assert_eq!(again.payload.expires_at, T + 3550);
        assert!(!again.refresh);
    }

    #[test]
    fn test_from_config() {
        let config = TokenConfig {
            sliding_window_secs: 60,
            default_lifetime_secs: 1800,
            codec: swifttoken_core::CodecKind::Json,
        };
        let sealer = Sealer::new(Arc::new(SecretKey::generate()));
        let issuer = TokenIssuer::from_config(sealer.clone(), &config);
        let verifier = TokenVerifier::from_config(sealer, &config)
            .with_clock(Arc::new(FixedClock::new(T + 1750)));
        assert_eq!(verifier.sliding_window_secs(), 60);

        let token = issuer.issue(&payload(true, 1800)).unwrap();
        assert!(verifier.verify(&token).unwrap().refresh);

        let token = issuer.issue(&payload(true, 1900)).unwrap();
        assert!(!verifier.verify(&token).unwrap().refresh);
    }
}
