//! Local validation of InPost access tokens.
//!
//! Access tokens are stored the way the API hands them out, including the
//! `Bearer ` scheme prefix, followed by a JWT. Only the `exp` claim of the
//! payload is looked at; the signature is the server's business.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::{InPostError, Result};

pub const BEARER_PREFIX: &str = "Bearer ";

/// base64url that accepts payload segments with or without padding
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: i64,
}

/// Split a stored token into its JWT payload segment.
///
/// Returns `None` when the token isn't `Bearer <header>.<payload>.<signature>`.
fn payload_segment(token: &str) -> Option<&str> {
    let jwt = token.strip_prefix(BEARER_PREFIX)?;
    let mut segments = jwt.split('.');

    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return None;
    }

    Some(payload)
}

/// Expiry instant of a bearer token, `None` if the token has the wrong shape
pub fn expires_at(token: &str) -> Result<Option<DateTime<Utc>>> {
    let Some(payload) = payload_segment(token) else {
        return Ok(None);
    };

    let json = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|e| InPostError::MalformedAccessToken(format!("payload is not base64url: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&json)
        .map_err(|e| InPostError::MalformedAccessToken(format!("payload is not JSON: {}", e)))?;

    DateTime::from_timestamp(claims.exp, 0)
        .map(Some)
        .ok_or_else(|| InPostError::MalformedAccessToken(format!("exp {} out of range", claims.exp)))
}

/// Whether `token` is present, well formed and not yet expired at `now`
pub fn is_valid_at(token: Option<&str>, now: DateTime<Utc>) -> Result<bool> {
    let Some(token) = token else {
        return Ok(false);
    };

    Ok(expires_at(token)?.is_some_and(|expiry| now < expiry))
}

/// Build a `Bearer` token carrying the given `exp` claim and a dummy signature
#[cfg(test)]
pub(crate) fn bearer_token(exp: i64) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"600100200","exp":{}}}"#, exp));
    format!("{}{}.{}.signature", BEARER_PREFIX, header, payload)
}
