//! # Authentication Library
//!
//! Client-side inspection of bearer credentials before they are attached to a
//! request.
//!
//! The client never holds the server's verification key, so signatures are not
//! checked here. What *can* be checked locally is everything the server would
//! reject without looking at the signature: structure, encoding, signing
//! algorithm and expiry. A credential failing any of these is never sent.

pub mod credential;
pub mod token;

// Re-export commonly used types
pub use credential::{inspect_bearer, inspect_token, BearerCredential, CredentialError, CredentialPolicy};
pub use token::{Claims, TokenHeader};
