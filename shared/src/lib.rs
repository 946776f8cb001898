//! # Shared Data Transfer Objects Library
//!
//! This library defines the wire contract between API clients and the remote
//! prediction-market API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: OTP and wallet-signature authentication
//!   - **[`dto::market`]**: Market listings, detail and order books
//!   - **[`dto::trade`]**: Trade preview, buy and sell
//!   - **[`dto::wallet`]**: Balances, withdrawals and admin review
//!
//! ## Wire Format
//!
//! The remote API speaks **camelCase** JSON, so every struct carries
//! `#[serde(rename_all = "camelCase")]`. Optional fields are omitted when `None`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shared::dto::trade::{Outcome, TradePreviewRequest};
//!
//! let request = TradePreviewRequest {
//!     market_id: "will-it-rain".to_string(),
//!     outcome: Outcome::Yes,
//!     stake: 10.0,
//! };
//! let body = serde_json::to_string(&request).unwrap();
//! assert!(body.contains("\"marketId\""));
//! ```

pub mod dto;

// Re-export commonly used types for convenience
pub use dto::*;
