//! # Client Error Taxonomy
//!
//! This module defines [`ClientError`], the single error type returned by every
//! client operation. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Local rejections** (never reach the network)
//!    - [`Validation`](ClientError::Validation) - a preflight contract check failed
//!
//! 2. **Server rejections** (4xx)
//!    - [`Authentication`](ClientError::Authentication) → 401
//!    - [`Authorization`](ClientError::Authorization) → 403
//!    - [`NotFound`](ClientError::NotFound) → 404
//!    - [`RateLimited`](ClientError::RateLimited) → 429
//!    - [`Rejected`](ClientError::Rejected) → any other 4xx
//!
//! 3. **Defects**
//!    - [`ServerFault`](ClientError::ServerFault) → 5xx. No malformed or adversarial
//!      input should ever produce one, so it is surfaced as a bug, never retried.
//!
//! 4. **Plumbing**
//!    - [`Transport`](ClientError::Transport), [`Decoding`](ClientError::Decoding),
//!      [`Config`](ClientError::Config)
//!
//! ## Status Convention
//!
//! The remote API accepts a range of statuses for some rejections (400 or 404
//! for an unknown market, 401 or 403 for a foreign resource). The client maps
//! them with one fixed table in [`ClientError::from_status`].

use std::time::Duration;

use lib_auth::CredentialError;
use thiserror::Error;

use crate::contract::ContractViolation;
use crate::redact::{sanitize_error, GENERIC_ERROR_MESSAGE};

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Request failed a preflight check and was never sent.
    #[error("Invalid request: {0}")]
    Validation(ContractViolation),

    /// Missing, malformed, expired or refused credential.
    ///
    /// **HTTP Status**: 401 Unauthorized. Never retried with the same credential.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Valid credential without the required scope or ownership.
    ///
    /// **HTTP Status**: 403 Forbidden
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Referenced resource does not exist.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Too many requests. Back off, not fatal.
    ///
    /// **HTTP Status**: 429 Too Many Requests
    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other client-error status.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 5xx from the remote API.
    #[error("Server fault ({status})")]
    ServerFault { status: u16 },

    /// Connection, timeout or dropped response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        let message = message.into();
        match status {
            401 => ClientError::Authentication(message),
            403 => ClientError::Authorization(message),
            404 => ClientError::NotFound(message),
            429 => ClientError::RateLimited { retry_after },
            500..=599 => ClientError::ServerFault { status },
            _ => ClientError::Rejected { status, message },
        }
    }

    /// HTTP status this error corresponds to, if it came from the server.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Authentication(_) => Some(401),
            ClientError::Authorization(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::RateLimited { .. } => Some(429),
            ClientError::Rejected { status, .. } | ClientError::ServerFault { status } => Some(*status),
            ClientError::Validation(_)
            | ClientError::Transport(_)
            | ClientError::Decoding(_)
            | ClientError::Config(_) => None,
        }
    }

    /// Safe to replay the same request (with the same idempotency key).
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::RateLimited { .. })
    }

    pub fn is_server_fault(&self) -> bool {
        matches!(self, ClientError::ServerFault { .. })
    }

    /// Stable identifier for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "Validation",
            ClientError::Authentication(_) => "Authentication",
            ClientError::Authorization(_) => "Authorization",
            ClientError::NotFound(_) => "NotFound",
            ClientError::RateLimited { .. } => "RateLimited",
            ClientError::Rejected { .. } => "Rejected",
            ClientError::ServerFault { .. } => "ServerFault",
            ClientError::Transport(_) => "Transport",
            ClientError::Decoding(_) => "Decoding",
            ClientError::Config(_) => "Config",
        }
    }

    /// Message suitable for display. Always passes through the redactor.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(violation) => sanitize_error(&violation.message),
            ClientError::Authentication(_) => "Please sign in again.".to_string(),
            ClientError::Authorization(msg)
            | ClientError::NotFound(msg)
            | ClientError::Rejected { message: msg, .. } => sanitize_error(msg),
            ClientError::RateLimited { .. } => "Too many requests. Please wait and try again.".to_string(),
            ClientError::Transport(_) => "Network error".to_string(),
            ClientError::ServerFault { .. } | ClientError::Decoding(_) | ClientError::Config(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<ContractViolation> for ClientError {
    fn from(violation: ContractViolation) -> Self {
        ClientError::Validation(violation)
    }
}

impl From<CredentialError> for ClientError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InsufficientRole(_) => ClientError::Authorization(err.to_string()),
            _ => ClientError::Authentication(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decoding(format!("JSON error: {}", err))
    }
}
