//! Unverified inspection of compact bearer tokens
//!
//! Only the payload segment is decoded, and only to read the optional `exp`
//! claim. Nothing here checks a signature: the result is advisory, so the UI
//! can react early, and the remote API stays the authority on validity.

use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;

use super::state::now_millis;

/// Standard alphabet, padded or not. Some issuers encode payloads this way.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from decoding a token's claim set
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token does not have three segments")]
    Malformed,

    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Expiry claim is not a number")]
    InvalidExpiry,
}

/// Decoded (unverified) claim set
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry in seconds since the epoch, when present
    pub exp: Option<f64>,
    /// Every claim, `exp` included
    pub raw: Map<String, Value>,
}

impl Claims {
    /// Whether the claim set is still live at `now_ms` (milliseconds since the epoch).
    ///
    /// A claim set without `exp` never expires.
    pub fn is_live_at(&self, now_ms: u64) -> bool {
        match self.exp {
            None => true,
            Some(exp) => exp * 1000.0 > now_ms as f64,
        }
    }
}

/// Decode the middle segment of a `header.payload.signature` token
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .or_else(|_| STANDARD_LENIENT.decode(payload))?;
    let raw = match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => map,
        _ => return Err(TokenError::NotAnObject),
    };

    let exp = match raw.get("exp") {
        None => None,
        // A null expiry is present but already past
        Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => Some(n.as_f64().ok_or(TokenError::InvalidExpiry)?),
        Some(_) => return Err(TokenError::InvalidExpiry),
    };

    Ok(Claims { exp, raw })
}

/// Local, unverified liveness check. Never fails: malformed tokens are not live.
pub fn is_token_live(token: &str) -> bool {
    is_token_live_at(token, now_millis())
}

pub fn is_token_live_at(token: &str, now_ms: u64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_live_at(now_ms),
        Err(e) => {
            tracing::debug!("Treating token as not authenticated: {}", e);
            false
        }
    }
}
