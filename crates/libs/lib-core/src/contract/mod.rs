//! # Request Contract
//!
//! Preflight checks that decide, before a request is sent, whether it is well
//! formed. The same rules describe what a compliant remote API must reject, so
//! the contract probe reuses them to judge server behaviour.
//!
//! ## Boundaries
//!
//! | Boundary | Checked locally by |
//! |----------|--------------------|
//! | Authentication | `lib_auth::inspect_bearer` |
//! | Input validation | [`auth`], [`trade`], [`wallet`], [`market::check_market_query`] |
//! | Ownership | server obligation (verified by the probe) |
//! | Sanitization | [`market::check_path_segment`] |
//! | Injection neutrality | [`payload`] |
//! | Idempotency | [`trade::check_trade_buy`] (key shape) |
//! | Information disclosure | [`response::audit_response`] |
//!
//! Every check returns [`Preflight`]: `Ok(())` to send, or a
//! [`ContractViolation`] naming the boundary and field. Checks never panic.

pub mod auth;
pub mod market;
pub mod payload;
pub mod response;
pub mod trade;
pub mod wallet;

pub use auth::{check_otp_request, check_otp_verify, check_wallet_challenge, check_wallet_verify};
pub use market::{check_market_query, check_path_segment};
pub use payload::{expect_scalar, inspect_payload, PayloadLimits};
pub use response::{audit_response, Disclosure, ResponseSnapshot};
pub use trade::{check_trade_buy, check_trade_preview, check_trade_sell, ensure_market_open, TradeLimits};
pub use wallet::{check_reject_reason, check_withdrawal, normalize_amount, parse_token};

use std::fmt;

/// Result of a preflight check.
pub type Preflight = Result<(), ContractViolation>;

/// Rule family a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Boundary {
    Authentication,
    InputValidation,
    Ownership,
    Sanitization,
    InjectionNeutrality,
    Idempotency,
    InformationDisclosure,
}

impl Boundary {
    pub const ALL: [Boundary; 7] = [
        Boundary::Authentication,
        Boundary::InputValidation,
        Boundary::Ownership,
        Boundary::Sanitization,
        Boundary::InjectionNeutrality,
        Boundary::Idempotency,
        Boundary::InformationDisclosure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Authentication => "authentication",
            Boundary::InputValidation => "input-validation",
            Boundary::Ownership => "ownership",
            Boundary::Sanitization => "sanitization",
            Boundary::InjectionNeutrality => "injection-neutrality",
            Boundary::Idempotency => "idempotency",
            Boundary::InformationDisclosure => "information-disclosure",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that must not be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    pub boundary: Boundary,
    pub field: String,
    pub message: String,
}

impl ContractViolation {
    pub fn new(boundary: Boundary, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            boundary,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the most common boundary.
    pub(crate) fn input(field: &str, message: impl Into<String>) -> Self {
        Self::new(Boundary::InputValidation, field, message)
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.boundary, self.message)
    }
}

impl std::error::Error for ContractViolation {}

/// Lift a `lib_utils` field validator into a violation.
pub(crate) fn field(result: Result<(), String>, field: &str) -> Preflight {
    result.map_err(|message| ContractViolation::input(field, message))
}
