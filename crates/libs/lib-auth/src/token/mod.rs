//! # JWT Token Structure
//!
//! Decoding of the three dot-separated segments of a compact JWT without
//! verifying the signature.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Number of segments in a compact JWS: header, payload, signature.
pub const JWT_SEGMENTS: usize = 3;

/// The JOSE header fields the client cares about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    /// Raw algorithm name as issued (`"RS256"`, `"none"`, ...)
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

/// Registered and application claims read from the payload.
///
/// Every field is optional: the server decides which claims it requires, the
/// client only acts on the ones present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Role granted to the subject (`"user"`, `"admin"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Raw segments of a compact JWT.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

/// Split a token into its segments. Returns the segment count on mismatch.
pub(crate) fn split_segments(token: &str) -> Result<Segments<'_>, usize> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [header, payload, signature] => Ok(Segments {
            header,
            payload,
            signature,
        }),
        _ => Err(parts.len()),
    }
}

/// Decode a base64url (no padding) segment holding a JSON object.
pub(crate) fn decode_json_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Option<T> {
    if segment.is_empty() {
        return None;
    }
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(segment).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}
