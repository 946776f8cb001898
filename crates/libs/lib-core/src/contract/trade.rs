//! Trade preview, buy and sell preflight.

use lib_utils::{is_valid_amount, is_valid_stake, MAX_SAFE_INTEGER};
use shared::dto::market::{Market, MarketStatus};
use shared::dto::trade::{TradeBuyRequest, TradePreviewRequest, TradeSellRequest};

use super::market::check_path_segment;
use super::{Boundary, ContractViolation, Preflight};

/// Default platform cap on a single stake, in USD.
pub const DEFAULT_MAX_STAKE: f64 = 100_000.0;

/// Longest idempotency key the client will send.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// Platform limits applied to trades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLimits {
    pub max_stake: f64,
}

impl Default for TradeLimits {
    fn default() -> Self {
        Self {
            max_stake: DEFAULT_MAX_STAKE,
        }
    }
}

fn check_stake(stake: f64, limits: &TradeLimits) -> Preflight {
    if !is_valid_stake(stake) {
        return Err(ContractViolation::input("stake", "Stake must be a positive finite number"));
    }
    if stake > limits.max_stake.min(MAX_SAFE_INTEGER) {
        return Err(ContractViolation::input(
            "stake",
            format!("Stake must not exceed {}", limits.max_stake),
        ));
    }
    Ok(())
}

pub fn check_trade_preview(req: &TradePreviewRequest, limits: &TradeLimits) -> Preflight {
    check_path_segment("marketId", &req.market_id)?;
    check_stake(req.stake, limits)
}

pub fn check_trade_buy(req: &TradeBuyRequest, limits: &TradeLimits) -> Preflight {
    check_path_segment("marketId", &req.market_id)?;
    check_stake(req.stake, limits)?;

    let key = &req.idempotency_key;
    if key.is_empty()
        || key.len() > MAX_IDEMPOTENCY_KEY_LEN
        || !key.bytes().all(|b| b.is_ascii_graphic())
    {
        return Err(ContractViolation::new(
            Boundary::Idempotency,
            "idempotencyKey",
            "Retry identifier must be 1-128 printable ASCII characters",
        ));
    }
    Ok(())
}

pub fn check_trade_sell(req: &TradeSellRequest) -> Preflight {
    check_path_segment("positionId", &req.position_id)?;
    if !is_valid_stake(req.shares_to_sell) || !is_valid_amount(req.shares_to_sell) {
        return Err(ContractViolation::input(
            "sharesToSell",
            "Shares to sell must be a positive finite number",
        ));
    }
    Ok(())
}

/// Only open markets accept new positions.
pub fn ensure_market_open(market: &Market) -> Preflight {
    if market.status != MarketStatus::Open {
        return Err(ContractViolation::input(
            "marketId",
            format!("Market is {} and not accepting trades", market.status),
        ));
    }
    Ok(())
}
