//! # Trade Data Transfer Objects
//!
//! - `POST /trade/preview` - [`TradePreviewRequest`] -> [`TradePreview`]
//! - `POST /trade/buy` - [`TradeBuyRequest`] -> [`Position`]
//! - `POST /trade/sell` - [`TradeSellRequest`] -> [`SellReceipt`]
//!
//! Stakes are plain JSON numbers. NaN and infinities cannot be represented on
//! the wire, which is one more reason they are rejected before dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a binary market.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => f.write_str("YES"),
            Outcome::No => f.write_str("NO"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradePreviewRequest {
    pub market_id: String,
    pub outcome: Outcome,
    pub stake: f64,
}

/// Estimated fill for a stake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradePreview {
    pub shares: f64,
    pub avg_price: f64,
    pub potential_payout: f64,
}

/// Buy request. The idempotency key makes retries of the same purchase safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeBuyRequest {
    pub market_id: String,
    pub outcome: Outcome,
    pub stake: f64,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeSellRequest {
    pub position_id: String,
    pub shares_to_sell: f64,
}

/// An open stake held by the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub market_id: String,
    pub outcome: Outcome,
    pub shares: f64,
    pub cost_basis: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SellReceipt {
    pub position_id: String,
    pub shares_sold: f64,
    pub proceeds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_request_wire_format() {
        let req = TradeBuyRequest {
            market_id: "m-1".to_string(),
            outcome: Outcome::No,
            stake: 12.5,
            idempotency_key: "1700000000000-abc123".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["marketId"], "m-1");
        assert_eq!(json["outcome"], "NO");
        assert_eq!(json["idempotencyKey"], "1700000000000-abc123");
    }

    #[test]
    fn test_outcome_rejects_unknown_values() {
        assert_eq!(serde_json::from_str::<Outcome>("\"YES\"").unwrap(), Outcome::Yes);
        assert!(serde_json::from_str::<Outcome>("\"yes\"").is_err());
        assert!(serde_json::from_str::<Outcome>("\"MAYBE\"").is_err());
    }
}
