//! Error types for the payload model.

use thiserror::Error;

/// A broken payload field rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadViolation {
    #[error("subject must not be empty")]
    EmptySubject,

    #[error("nonce must not be empty")]
    EmptyNonce,

    #[error("session_id must not be empty")]
    EmptySessionId,

    #[error("permissions must not be empty")]
    NoPermissions,

    #[error("issued_at must be non-zero")]
    ZeroIssuedAt,

    #[error("expires_at must be non-zero")]
    ZeroExpiresAt,

    #[error("expires_at ({expires_at}) is before issued_at ({issued_at})")]
    ExpiresBeforeIssued { issued_at: i64, expires_at: i64 },
}
