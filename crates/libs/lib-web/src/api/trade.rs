//! # Trade Endpoints
//!
//! Preview, buy and sell. Buys carry an idempotency key; [`place_trade`] is
//! the entry point that owns the key and the retry policy.

use std::time::Duration;

use lib_auth::BearerCredential;
use lib_core::contract::{check_trade_buy, check_trade_preview, check_trade_sell, ensure_market_open};
use lib_core::{ClientError, IdempotencyKey, Result};
use shared::{Market, Outcome, Position, SellReceipt, TradeBuyRequest, TradePreview, TradePreviewRequest, TradeSellRequest};
use tracing::{info, warn};

use super::client::ApiClient;

/// Upper bound on a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[tracing::instrument(skip(client))]
pub async fn trade_preview(client: &ApiClient, request: &TradePreviewRequest) -> Result<TradePreview> {
    check_trade_preview(request, client.trade_limits())?;

    let body = client.json_body(request)?;
    let url = client.endpoint(&["trade", "preview"])?;
    client.execute(client.http.post(url).json(&body), "trade_preview").await
}

/// Send one buy attempt. The key in `request` is used as given.
#[tracing::instrument(skip(client, credential), fields(market_id = %request.market_id, key = %request.idempotency_key))]
pub async fn trade_buy(client: &ApiClient, credential: &BearerCredential, request: &TradeBuyRequest) -> Result<Position> {
    check_trade_buy(request, client.trade_limits())?;

    let body = client.json_body(request)?;
    let url = client.endpoint(&["trade", "buy"])?;
    let builder = client.with_bearer(client.http.post(url).json(&body), credential)?;
    client.execute(builder, "trade_buy").await
}

/// Delay before retry number `attempt` (0-based).
fn backoff_delay(base: Duration, attempt: u32, err: &ClientError) -> Duration {
    let delay = match err {
        ClientError::RateLimited { retry_after: Some(after) } => *after,
        _ => base.saturating_mul(2u32.saturating_pow(attempt)),
    };
    delay.min(MAX_BACKOFF)
}

/// Buy into an open market.
///
/// One idempotency key is generated per call and reused on every retry.
/// Only transport failures and 429s are retried.
#[tracing::instrument(skip(client, credential, market), fields(market_id = %market.id))]
pub async fn place_trade(
    client: &ApiClient,
    credential: &BearerCredential,
    market: &Market,
    outcome: Outcome,
    stake: f64,
) -> Result<Position> {
    ensure_market_open(market)?;

    let request = TradeBuyRequest {
        market_id: market.id.clone(),
        outcome,
        stake,
        idempotency_key: IdempotencyKey::new().into(),
    };

    let mut attempt = 0;
    loop {
        match trade_buy(client, credential, &request).await {
            Ok(position) => {
                info!(attempt, position_id = %position.id, "trade placed");
                return Ok(position);
            }
            Err(err) if err.is_retryable() && attempt < client.max_retries => {
                let delay = backoff_delay(client.retry_backoff, attempt, &err);
                warn!(attempt, code = err.code(), delay_ms = delay.as_millis() as u64, "retrying trade");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[tracing::instrument(skip(client, credential))]
pub async fn trade_sell(client: &ApiClient, credential: &BearerCredential, request: &TradeSellRequest) -> Result<SellReceipt> {
    check_trade_sell(request)?;

    let body = client.json_body(request)?;
    let url = client.endpoint(&["trade", "sell"])?;
    let builder = client.with_bearer(client.http.post(url).json(&body), credential)?;
    client.execute(builder, "trade_sell").await
}
