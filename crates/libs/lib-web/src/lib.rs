//! # Web Library
//!
//! The network side of the request contract: a typed API client that runs
//! every preflight check before dispatch, and the contract probe that checks
//! a live API against the same rules from the outside.

pub mod api;
pub mod probe;

#[cfg(test)]
mod tests;

pub use api::ApiClient;
pub use probe::{ContractProbe, ProbeReport};
