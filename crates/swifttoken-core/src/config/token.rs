//! Token policy configuration.

use serde::{Deserialize, Serialize};

/// Renewal window used when none is configured: 15 minutes.
pub const DEFAULT_SLIDING_WINDOW_SECS: i64 = 15 * 60;

/// Lifetime of newly issued tokens when none is configured: 30 minutes.
pub const DEFAULT_LIFETIME_SECS: i64 = 30 * 60;

/// Token lifetime and renewal policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Seconds before expiry during which a sliding token asks to be renewed.
    #[serde(default = "default_sliding_window_secs")]
    pub sliding_window_secs: i64,

    /// Lifetime of newly issued tokens, in seconds.
    #[serde(default = "default_lifetime_secs")]
    pub default_lifetime_secs: i64,

    /// Payload serialization format.
    #[serde(default)]
    pub codec: CodecKind,
}

/// Payload serialization format.
///
/// Issuer and verifier must agree on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Compact binary encoding.
    #[default]
    Bincode,
    /// JSON with short field names.
    Json,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            sliding_window_secs: DEFAULT_SLIDING_WINDOW_SECS,
            default_lifetime_secs: DEFAULT_LIFETIME_SECS,
            codec: CodecKind::default(),
        }
    }
}

fn default_sliding_window_secs() -> i64 {
    DEFAULT_SLIDING_WINDOW_SECS
}

fn default_lifetime_secs() -> i64 {
    DEFAULT_LIFETIME_SECS
}
