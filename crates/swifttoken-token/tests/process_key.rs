//! The process-wide key slot.
//!
//! Kept in its own test binary: the slot can only be written once per process.

use std::sync::Arc;
use swifttoken_token::keys::{self, SecretKey};
use swifttoken_token::{
    FixedClock, KeyError, Payload, SealError, Sealer, TokenIssuer, TokenVerifier,
};

#[test]
fn test_install_once_then_use() {
    assert!(matches!(keys::installed(), Err(KeyError::Missing)));
    assert!(matches!(
        Sealer::from_installed_key(),
        Err(SealError::Key(KeyError::Missing))
    ));

    keys::install(SecretKey::parse("12345678901234567890123456789012").unwrap()).unwrap();
    assert!(matches!(
        keys::install(SecretKey::generate()),
        Err(KeyError::AlreadyInstalled)
    ));

    let issuer = TokenIssuer::new(Sealer::from_installed_key().unwrap());
    let verifier = TokenVerifier::new(Sealer::from_installed_key().unwrap())
        .with_clock(Arc::new(FixedClock::new(1_000)));

    let payload = Payload::new("svc", "s-1", "n-1", 1_000, 60).with_permission("read");
    let token = issuer.issue(&payload).unwrap();
    assert_eq!(verifier.verify(&token).unwrap().payload, payload);

    // A sealer built from an explicit copy of the same key interoperates.
    let explicit = Sealer::new(Arc::new(
        SecretKey::parse("12345678901234567890123456789012").unwrap(),
    ));
    assert!(explicit.open(&token).is_ok());
}
