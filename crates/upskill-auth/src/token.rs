//! Client-side inspection of bearer tokens.
//!
//! Tokens are three dot-separated segments whose middle segment is a
//! base64-encoded JSON object. Nothing here verifies a signature: the
//! expiry check only decides whether a stored token is worth keeping.
//! The backend validates every request on its own.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AuthError;

/// Accepts both the standard and the URL-safe alphabet, padded or not.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Claims read from a token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiration (Unix timestamp, seconds).
    #[serde(default)]
    pub exp: Option<f64>,
    /// Subject (user ID).
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    /// Any other claims.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Decode the payload segment of a `header.payload.signature` token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut parts = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::TokenInvalid("expected three segments".into()));
    };

    let normalized: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(normalized)
        .map_err(|e| AuthError::TokenInvalid(format!("payload is not base64: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::TokenInvalid(format!("payload is not a JSON object: {e}")))
}

/// `true` when the token is absent, malformed, has no `exp` claim, or
/// `exp` lies in the past.
pub fn is_token_expired(token: Option<&str>) -> bool {
    is_token_expired_at(token, Utc::now().timestamp())
}

/// [`is_token_expired`] against an explicit clock (seconds since epoch).
pub fn is_token_expired_at(token: Option<&str>, now_secs: i64) -> bool {
    let Some(token) = token else {
        return true;
    };
    match decode_claims(token) {
        Ok(TokenClaims { exp: Some(exp), .. }) => exp < now_secs as f64,
        _ => true,
    }
}
