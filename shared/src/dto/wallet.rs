//! # Wallet Data Transfer Objects
//!
//! - `GET /wallet/balances` - `Vec<Balance>`
//! - `POST /crypto/withdraw` - [`WithdrawalRequest`] -> [`WithdrawalReceipt`]
//! - `POST /admin/crypto/withdrawals/{id}/reject` - [`RejectWithdrawalRequest`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tokens accepted for deposits and withdrawals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoToken {
    Eth,
    Usdc,
    Usdt,
}

impl CryptoToken {
    pub const ALL: [CryptoToken; 3] = [CryptoToken::Eth, CryptoToken::Usdc, CryptoToken::Usdt];

    pub fn symbol(&self) -> &'static str {
        match self {
            CryptoToken::Eth => "ETH",
            CryptoToken::Usdc => "USDC",
            CryptoToken::Usdt => "USDT",
        }
    }
}

impl fmt::Display for CryptoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CryptoToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CryptoToken::ALL
            .into_iter()
            .find(|t| t.symbol() == s)
            .ok_or_else(|| format!("unsupported token: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub token: CryptoToken,
    pub available: f64,
    #[serde(default)]
    pub locked: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub token: CryptoToken,
    pub amount: f64,
    pub destination_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalReceipt {
    pub id: String,
    pub status: String,
}

/// Admin rejection of a pending withdrawal. The reason is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RejectWithdrawalRequest {
    pub reason: String,
}
