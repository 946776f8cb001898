//! # Core Library
//!
//! The client-side trading-request contract: error taxonomy, configuration,
//! error redaction, idempotency keys, and the preflight checks every request
//! passes before it leaves the client.

pub mod config;
pub mod contract;
pub mod error;
pub mod idempotency;
pub mod redact;

// Re-export commonly used types
pub use config::ClientConfig;
pub use contract::{Boundary, ContractViolation, Preflight};
pub use error::{ClientError, Result};
pub use idempotency::{generate_idempotency_key, IdempotencyKey};
pub use redact::{error_message_or, sanitize_error, GENERIC_ERROR_MESSAGE};
