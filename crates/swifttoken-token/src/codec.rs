//! Payload serialization boundary.

use crate::error::CodecError;
use bincode::Options;
use std::sync::Arc;
use swifttoken_core::{CodecKind, Payload};

/// Upper bound on an encoded payload accepted by [`BincodeCodec`].
pub const MAX_ENCODED_LEN: u64 = 1024 * 1024;

/// Converts payloads to bytes and back.
///
/// `decode(encode(p)) == p` must hold for every valid payload, and malformed
/// input must produce an error rather than a panic.
pub trait PayloadCodec: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn encode(&self, payload: &Payload) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Payload, CodecError>;
}

/// Compact fixed-width binary encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(MAX_ENCODED_LEN)
            .reject_trailing_bytes()
    }
}

impl PayloadCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode(&self, payload: &Payload) -> Result<Vec<u8>, CodecError> {
        Self::options()
            .serialize(payload)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Payload, CodecError> {
        Self::options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// JSON with the short field names (`s`, `i`, `e`, `n`, `r`, `p`, `sl`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, payload: &Payload) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(payload).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Payload, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// The codec selected by configuration.
pub fn codec_for(kind: CodecKind) -> Arc<dyn PayloadCodec> {
    match kind {
        CodecKind::Bincode => Arc::new(BincodeCodec),
        CodecKind::Json => Arc::new(JsonCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload::new("user123", "sess1", "abc123", 1_700_000_000, 1800)
            .with_permissions(["read", "write"])
            .sliding(true)
    }

    fn codecs() -> Vec<Arc<dyn PayloadCodec>> {
        vec![codec_for(CodecKind::Bincode), codec_for(CodecKind::Json)]
    }

    #[test]
    fn test_roundtrip() {
        for codec in codecs() {
            let bytes = codec.encode(&payload()).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), payload(), "{}", codec.name());
        }
    }

    #[test]
    fn test_unicode_and_empty_strings_roundtrip() {
        let mut p = payload();
        p.subject = "ユーザー🙂".into();
        p.permissions.push(String::new());
        for codec in codecs() {
            let bytes = codec.encode(&p).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), p, "{}", codec.name());
        }
    }

    #[test]
    fn test_garbage_fails_cleanly() {
        for codec in codecs() {
            assert!(matches!(
                codec.decode(b"garbage token data"),
                Err(CodecError::Decode(_))
            ));
            assert!(codec.decode(&[]).is_err());
        }
    }

    #[test]
    fn test_bincode_rejects_trailing_bytes() {
        let codec = BincodeCodec;
        let mut bytes = codec.encode(&payload()).unwrap();
        bytes.push(0);
        assert!(codec.decode(&bytes).is_err());
    }

    #[test]
    fn test_bincode_rejects_truncation() {
        let codec = BincodeCodec;
        let bytes = codec.encode(&payload()).unwrap();
        for len in 0..bytes.len() {
            assert!(codec.decode(&bytes[..len]).is_err(), "prefix {len} decoded");
        }
    }

    #[test]
    fn test_bincode_huge_length_prefix_fails() {
        // Subject length prefix claims u64::MAX bytes.
        let bytes = [0xFFu8; 8];
        assert!(BincodeCodec.decode(&bytes).is_err());
    }

    #[test]
    fn test_json_missing_field_fails() {
        let json = br#"{"s":"u","i":1,"e":2,"n":"n","r":"r","p":["read"]}"#;
        assert!(JsonCodec.decode(json).is_err());
    }
}
