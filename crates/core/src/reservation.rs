//! Pure reservation rules shared by the coordinator and the API layer.
//!
//! Holds are time-boxed: a hold whose deadline has passed is *logically*
//! available even before the sweeper physically reverts the row, so every
//! precondition check goes through [`hold_expired`] rather than comparing
//! timestamps inline.

use chrono::Duration;

use crate::types::Timestamp;

/// Maximum accepted holder token length.
///
/// Tokens are generated client-side per form session and are opaque to the
/// server; the cap only guards against abusive payloads.
pub const MAX_HOLDER_TOKEN_LEN: usize = 128;

/// Returns true when a hold deadline has passed.
///
/// A claim with no deadline (available, pending approval, occupied) never
/// counts as expired.
pub fn hold_expired(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    match expires_at {
        Some(deadline) => deadline <= now,
        None => false,
    }
}

/// Clamp a caller-supplied TTL to the configured bounds.
///
/// `None` means the caller did not override the TTL and gets the default.
pub fn clamp_ttl(requested_secs: Option<i64>, default_secs: i64, min_secs: i64, max_secs: i64) -> Duration {
    let secs = requested_secs
        .unwrap_or(default_secs)
        .clamp(min_secs, max_secs);
    Duration::seconds(secs)
}

/// Validate the shape of a holder token.
///
/// The token is opaque — only emptiness, whitespace, and length are checked.
pub fn validate_holder_token(token: &str) -> Result<(), String> {
    if token.trim().is_empty() {
        return Err("holder_token must not be empty".to_string());
    }
    if token.len() > MAX_HOLDER_TOKEN_LEN {
        return Err(format!(
            "holder_token must be at most {MAX_HOLDER_TOKEN_LEN} characters"
        ));
    }
    Ok(())
}
