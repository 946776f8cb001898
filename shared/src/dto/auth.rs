//! # Authentication Data Transfer Objects
//!
//! Two sign-in flows are supported by the remote API:
//!
//! ### Email OTP
//! 1. `POST /auth/request-otp` - [`OtpRequest`]
//! 2. `POST /auth/verify-otp` - [`OtpVerifyRequest`] -> [`AuthSession`]
//!
//! ### Wallet signature
//! 1. `POST /auth/wallet/challenge` - [`WalletChallengeRequest`] -> [`WalletChallengeResponse`]
//! 2. `POST /auth/wallet/verify` - [`WalletVerifyRequest`] -> [`AuthSession`]
//!
//! The returned [`AuthSession::token`] is sent as `Authorization: Bearer <token>`
//! on every protected endpoint.

use serde::{Deserialize, Serialize};

/// Request an email one-time passcode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub email: String,
}

/// Exchange an emailed passcode for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerifyRequest {
    pub email: String,
    /// Exactly six ASCII digits, sent as a string
    pub code: String,
}

/// Ask the API for a message to sign with the wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletChallengeRequest {
    pub wallet_address: String,
}

/// Challenge message issued for a wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletChallengeResponse {
    pub message: String,
}

/// Signed challenge submitted to complete wallet sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletVerifyRequest {
    pub message: String,
    /// 65-byte secp256k1 signature, `0x`-prefixed hex
    pub signature: String,
}

/// Session issued after a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}
