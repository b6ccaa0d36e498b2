//! Claims carried inside a sealed token.

use crate::error::PayloadViolation;
use serde::{Deserialize, Serialize};

/// The claims sealed into a token.
///
/// Field names on the wire are kept short so that textual codecs stay compact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Identifier of the token holder.
    #[serde(rename = "s")]
    pub subject: String,

    /// Unix timestamp (seconds) the token becomes valid.
    #[serde(rename = "i")]
    pub issued_at: i64,

    /// Unix timestamp (seconds) after which the token is rejected.
    #[serde(rename = "e")]
    pub expires_at: i64,

    /// Caller-supplied opaque value for replay auditing.
    ///
    /// Not related to the cryptographic nonce of the sealed token.
    #[serde(rename = "n")]
    pub nonce: String,

    /// Session the token belongs to.
    #[serde(rename = "r")]
    pub session_id: String,

    /// Granted permissions, in issue order.
    #[serde(rename = "p")]
    pub permissions: Vec<String>,

    /// Whether the holder should be told to renew near expiry.
    #[serde(rename = "sl")]
    pub sliding: bool,
}

impl Payload {
    /// Create a payload valid from `issued_at` for `lifetime_secs` seconds.
    pub fn new(
        subject: impl Into<String>,
        session_id: impl Into<String>,
        nonce: impl Into<String>,
        issued_at: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime_secs),
            nonce: nonce.into(),
            session_id: session_id.into(),
            permissions: Vec::new(),
            sliding: false,
        }
    }

    /// Add a permission.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Replace all permissions.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the token as sliding.
    pub fn sliding(mut self, sliding: bool) -> Self {
        self.sliding = sliding;
        self
    }

    /// Check every field rule, reporting the first one broken.
    pub fn validate(&self) -> Result<(), PayloadViolation> {
        if self.subject.is_empty() {
            return Err(PayloadViolation::EmptySubject);
        }
        if self.nonce.is_empty() {
            return Err(PayloadViolation::EmptyNonce);
        }
        if self.session_id.is_empty() {
            return Err(PayloadViolation::EmptySessionId);
        }
        if self.permissions.is_empty() {
            return Err(PayloadViolation::NoPermissions);
        }
        if self.issued_at == 0 {
            return Err(PayloadViolation::ZeroIssuedAt);
        }
        if self.expires_at == 0 {
            return Err(PayloadViolation::ZeroExpiresAt);
        }
        if self.expires_at < self.issued_at {
            return Err(PayloadViolation::ExpiresBeforeIssued {
                issued_at: self.issued_at,
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }

    /// Whether all field rules hold.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Seconds left until expiry as seen at `now`. Negative once expired.
    pub fn remaining_secs(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now)
    }

    /// A copy of these claims re-dated to start at `now`.
    pub fn renewed(&self, now: i64, lifetime_secs: i64) -> Self {
        Self {
            issued_at: now,
            expires_at: now.saturating_add(lifetime_secs),
            ..self.clone()
        }
    }
}
