// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read claims out of an access token without verifying it.
//!
//! The client is not the token's audience; the backend verifies the
//! signature. We only need the user id for building request paths.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("invalid JWT format")]
    Malformed,

    #[error("JWT payload is not valid JSON: {0}")]
    Payload(String),

    #[error("claim {0:?} missing from token")]
    Missing(String),

    #[error("claim {0:?} is not a numeric user id")]
    NotNumeric(String),
}

/// Decode the numeric user id stored under `claim` in a JWT payload.
///
/// Accepts the claim as a JSON number or a numeric string.
pub fn decode_user_id(token: &str, claim: &str) -> Result<u64, ClaimError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(ClaimError::Malformed),
    };

    // Some issuers keep the base64 padding.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ClaimError::Malformed)?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| ClaimError::Payload(e.to_string()))?;

    match value.get(claim) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| ClaimError::NotNumeric(claim.to_string())),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| ClaimError::NotNumeric(claim.to_string())),
        Some(_) => Err(ClaimError::NotNumeric(claim.to_string())),
        None => Err(ClaimError::Missing(claim.to_string())),
    }
}
