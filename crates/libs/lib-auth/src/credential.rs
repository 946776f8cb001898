//! # Bearer Credential Inspection
//!
//! Validates an `Authorization` header value before it is attached to a
//! protected request.
//!
//! ## Rejection Rules
//!
//! | Input | Error |
//! |-------|-------|
//! | no header | [`CredentialError::Missing`] |
//! | `""`, `"Bearer "` | [`CredentialError::Empty`] |
//! | no `Bearer ` scheme (any case) | [`CredentialError::MissingScheme`] |
//! | `null`, `undefined` | [`CredentialError::Placeholder`] |
//! | not three segments | [`CredentialError::SegmentCount`] |
//! | header / payload not base64url JSON | [`CredentialError::MalformedHeader`] / [`CredentialError::MalformedPayload`] |
//! | `alg: none` | [`CredentialError::Unsigned`] |
//! | algorithm outside the policy | [`CredentialError::DisallowedAlgorithm`] |
//! | empty signature | [`CredentialError::MissingSignature`] |
//! | `exp` in the past | [`CredentialError::Expired`] |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lib_auth::{inspect_bearer, CredentialPolicy};
//!
//! let policy = CredentialPolicy::default();
//! match inspect_bearer(Some("Bearer eyJ..."), &policy) {
//!     Ok(credential) => println!("sending as {}", credential.claims().sub.as_deref().unwrap_or("?")),
//!     Err(e) => println!("refusing to send: {e}"),
//! }
//! ```

use chrono::Utc;
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::token::{decode_json_segment, split_segments, Claims, TokenHeader};

/// Token values that front-end code produces when a session variable is unset.
const PLACEHOLDER_TOKENS: &[&str] = &["null", "undefined"];

const BEARER_PREFIX: &str = "Bearer ";

// region:    --- Error

/// Why a credential was refused locally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Authorization header is missing")]
    Missing,

    #[error("Authorization credential is empty")]
    Empty,

    #[error("Authorization header must use the Bearer scheme")]
    MissingScheme,

    #[error("Authorization credential is a placeholder value")]
    Placeholder,

    #[error("Credential has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("Credential header is not valid base64url JSON")]
    MalformedHeader,

    #[error("Credential payload is not valid base64url JSON")]
    MalformedPayload,

    #[error("Unsigned credentials are not accepted")]
    Unsigned,

    #[error("Signing algorithm {0} is not accepted")]
    DisallowedAlgorithm(String),

    #[error("Credential has no signature")]
    MissingSignature,

    #[error("Credential expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("Credential lacks the {0} role")]
    InsufficientRole(String),
}

// endregion: --- Error

// region:    --- Policy

/// Which credentials the client is willing to send.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialPolicy {
    /// Accepted signing algorithms
    pub allowed_algorithms: Vec<Algorithm>,
    /// Seconds of clock skew tolerated on `exp`
    pub leeway_secs: i64,
}

impl Default for CredentialPolicy {
    /// Asymmetric algorithms only.
    fn default() -> Self {
        Self {
            allowed_algorithms: vec![
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
                Algorithm::ES256,
                Algorithm::ES384,
                Algorithm::EdDSA,
            ],
            leeway_secs: 0,
        }
    }
}

impl CredentialPolicy {
    /// Build a policy from algorithm names such as `["RS256", "ES256"]`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CredentialError> {
        let mut allowed_algorithms = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case("none") {
                return Err(CredentialError::Unsigned);
            }
            let alg = Algorithm::from_str(name)
                .map_err(|_| CredentialError::DisallowedAlgorithm(name.to_string()))?;
            if !allowed_algorithms.contains(&alg) {
                allowed_algorithms.push(alg);
            }
        }
        Ok(Self {
            allowed_algorithms,
            ..Self::default()
        })
    }

    pub fn allows(&self, alg: Algorithm) -> bool {
        self.allowed_algorithms.contains(&alg)
    }
}

// endregion: --- Policy

// region:    --- BearerCredential

/// A credential that passed every local check.
#[derive(Debug, Clone, PartialEq)]
pub struct BearerCredential {
    token: String,
    algorithm: Algorithm,
    claims: Claims,
}

impl BearerCredential {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.token)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.role.as_deref() == Some(role)
    }

    /// Fail unless the credential carries `role`.
    pub fn require_role(&self, role: &str) -> Result<(), CredentialError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(CredentialError::InsufficientRole(role.to_string()))
        }
    }
}

// endregion: --- BearerCredential

// region:    --- Inspection

/// Inspect a raw `Authorization` header value.
pub fn inspect_bearer(
    header: Option<&str>,
    policy: &CredentialPolicy,
) -> Result<BearerCredential, CredentialError> {
    let header = header.ok_or(CredentialError::Missing)?;
    if header.trim().is_empty() {
        return Err(CredentialError::Empty);
    }

    // Auth schemes are case-insensitive.
    let token = header
        .split_at_checked(BEARER_PREFIX.len())
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
        .map(|(_, token)| token)
        .ok_or(CredentialError::MissingScheme)?;

    inspect_token(token, policy)
}

/// Inspect a bare token against the current time.
pub fn inspect_token(token: &str, policy: &CredentialPolicy) -> Result<BearerCredential, CredentialError> {
    inspect_token_at(token, policy, Utc::now().timestamp())
}

/// Inspect a bare token against an explicit Unix time.
pub fn inspect_token_at(
    token: &str,
    policy: &CredentialPolicy,
    now: i64,
) -> Result<BearerCredential, CredentialError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::Empty);
    }
    if PLACEHOLDER_TOKENS.contains(&token) {
        return Err(CredentialError::Placeholder);
    }

    let segments = split_segments(token).map_err(CredentialError::SegmentCount)?;

    let header: TokenHeader =
        decode_json_segment(segments.header).ok_or(CredentialError::MalformedHeader)?;
    if header.alg.eq_ignore_ascii_case("none") {
        return Err(CredentialError::Unsigned);
    }
    let algorithm = Algorithm::from_str(&header.alg)
        .map_err(|_| CredentialError::DisallowedAlgorithm(header.alg.clone()))?;
    if !policy.allows(algorithm) {
        debug!(alg = %header.alg, "credential algorithm outside policy");
        return Err(CredentialError::DisallowedAlgorithm(header.alg));
    }

    let claims: Claims =
        decode_json_segment(segments.payload).ok_or(CredentialError::MalformedPayload)?;

    if segments.signature.is_empty() {
        return Err(CredentialError::MissingSignature);
    }

    if let Some(exp) = claims.exp {
        if exp.saturating_add(policy.leeway_secs) <= now {
            return Err(CredentialError::Expired { expired_at: exp });
        }
    }

    Ok(BearerCredential {
        token: token.to_string(),
        algorithm,
        claims,
    })
}

// endregion: --- Inspection
