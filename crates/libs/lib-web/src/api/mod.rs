//! # API Module
//!
//! Typed client for the remote market API, organized by area:
//!
//! - **[`client`]**: HTTP client, response classification
//! - **[`auth`]**: OTP and wallet sign-in
//! - **[`market`]**: Market listings and order books
//! - **[`trade`]**: Preview, buy and sell
//! - **[`wallet`]**: Balances, withdrawals, admin review
//!
//! Protected endpoints take a [`lib_auth::BearerCredential`], obtained from
//! [`ApiClient::authorize`], so an unchecked token cannot reach the wire.

// region: --- Modules
pub mod auth;
pub mod client;
pub mod market;
pub mod trade;
pub mod wallet;
// endregion: --- Modules

// region: --- Re-exports
pub use client::ApiClient;
// endregion: --- Re-exports
