//! Token commands.
//!
//! `swifttoken token issue` - Seal a new session token.
//! `swifttoken token verify` - Open and check a token.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swifttoken_core::SwiftTokenConfig;
use swifttoken_token::{Payload, SecretKey, Sealer, TokenIssuer, TokenVerifier, VerifiedToken};
use uuid::Uuid;

/// Claims and output options for `token issue`.
#[derive(Debug, Clone, Default)]
pub struct IssueArgs {
    pub subject: String,
    pub permissions: Vec<String>,
    pub session_id: Option<String>,
    pub nonce: Option<String>,
    pub expires: Option<String>,
    pub sliding: bool,
    pub output: Option<PathBuf>,
}

/// Resolve the key from an explicit argument or the configuration.
///
/// The argument can be:
/// - A path to a file containing the key
/// - The key itself (32 raw characters or base64), e.g. from SWIFTTOKEN_SECRET
fn resolve_key(key: Option<String>, config: &SwiftTokenConfig) -> anyhow::Result<SecretKey> {
    let Some(key_str) = key else {
        return SecretKey::from_config(&config.secret).context(
            "Token key not provided. Either pass --key <path|key> or set SWIFTTOKEN_SECRET",
        );
    };

    // If it looks like a file path and the file exists, load from file
    let path = Path::new(&key_str);
    if path.exists() {
        return SecretKey::load_from_file(path)
            .with_context(|| format!("Failed to load key from file: {}", path.display()));
    }

    SecretKey::parse(&key_str)
        .context("Failed to parse key. Expected 32 raw bytes or base64 of 32 bytes")
}

/// Parse a duration string like "30m", "24h", "7d" into seconds.
fn parse_duration(s: &str) -> anyhow::Result<i64> {
    let s = s.trim().to_lowercase();

    let duration = if let Some(days) = s.strip_suffix('d') {
        chrono::Duration::try_days(days.parse()?)
    } else if let Some(hours) = s.strip_suffix('h') {
        chrono::Duration::try_hours(hours.parse()?)
    } else if let Some(minutes) = s.strip_suffix('m') {
        chrono::Duration::try_minutes(minutes.parse()?)
    } else if let Some(seconds) = s.strip_suffix('s') {
        chrono::Duration::try_seconds(seconds.parse()?)
    } else {
        // No suffix means seconds
        chrono::Duration::try_seconds(s.parse()?)
    }
    .with_context(|| format!("Duration out of range: {s}"))?;

    let secs = duration.num_seconds();
    anyhow::ensure!(secs > 0, "Duration must be positive: {s}");
    Ok(secs)
}

/// Read a token from a file if the argument names one.
fn read_token_arg(token: String) -> anyhow::Result<String> {
    if Path::new(&token).exists() {
        Ok(fs::read_to_string(&token)?.trim().to_string())
    } else {
        Ok(token)
    }
}

fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

/// Issue a new token and print or write it. Returns the token string.
pub fn issue(
    key: Option<String>,
    config: &SwiftTokenConfig,
    args: IssueArgs,
) -> anyhow::Result<String> {
    let key = resolve_key(key, config)?;
    let issuer = TokenIssuer::from_config(Sealer::new(Arc::new(key)), &config.token);

    let lifetime = match &args.expires {
        Some(expires) => parse_duration(expires)?,
        None => config.token.default_lifetime_secs,
    };
    let session_id = args
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let nonce = args.nonce.unwrap_or_else(|| Uuid::new_v4().to_string());

    let payload = Payload::new(
        &args.subject,
        session_id,
        nonce,
        Utc::now().timestamp(),
        lifetime,
    )
    .with_permissions(args.permissions)
    .sliding(args.sliding);

    let token = issuer.issue_string(&payload).context("Failed to issue token")?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Subject: {}", payload.subject);
        println!("  Session: {}", payload.session_id);
        println!("  Permissions: {}", payload.permissions.join(", "));
        println!("  Expires: {}", format_timestamp(payload.expires_at));
        if payload.sliding {
            println!("  Sliding: yes");
        }
    } else {
        println!("{}", token);
    }

    Ok(token)
}

/// Verify a token and print its claims.
///
/// `at` overrides the current time (Unix seconds).
pub fn verify(
    key: Option<String>,
    config: &SwiftTokenConfig,
    token: String,
    at: Option<i64>,
) -> anyhow::Result<VerifiedToken> {
    let key = resolve_key(key, config)?;
    let verifier = TokenVerifier::from_config(Sealer::new(Arc::new(key)), &config.token);

    let token_str = read_token_arg(token)?;
    let now = at.unwrap_or_else(|| Utc::now().timestamp());
    let bytes = swifttoken_token::decode_token(&token_str)?;

    let verified = verifier
        .verify_at(&bytes, now)
        .context("✖ Token verification failed")?;

    let payload = &verified.payload;
    println!("✔ Token is valid");
    println!();
    println!("Token Details:");
    println!("  Subject: {}", payload.subject);
    println!("  Session: {}", payload.session_id);
    println!("  Nonce: {}", payload.nonce);
    println!("  Permissions: {}", payload.permissions.join(", "));
    println!("  Issued: {}", format_timestamp(payload.issued_at));
    println!("  Expires: {}", format_timestamp(payload.expires_at));
    println!("  Remaining: {}s", payload.remaining_secs(now));
    if verified.refresh {
        println!("  Refresh: yes (reissue before expiry)");
    } else if payload.sliding {
        println!("  Refresh: not yet");
    }

    Ok(verified)
}
