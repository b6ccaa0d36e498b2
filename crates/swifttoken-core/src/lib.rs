//! # swifttoken-core
//!
//! Shared types for SwiftToken sealed session tokens.
//!
//! - [`Payload`]: the claims sealed into a token, with their validity rules
//! - [`config`]: YAML configuration for key provisioning and token policy
//!
//! This crate has no cryptography; sealing and the token protocol live in
//! `swifttoken-token`.

pub mod config;
pub mod error;
pub mod payload;

pub use config::{CodecKind, ConfigError, SecretConfig, SwiftTokenConfig, TokenConfig};
pub use error::PayloadViolation;
pub use payload::Payload;
