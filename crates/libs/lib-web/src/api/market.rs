//! # Market Endpoints
//!
//! Public market data. No credential is required.

use lib_core::contract::{check_market_query, check_path_segment};
use lib_core::Result;
use shared::{Market, MarketList, MarketQuery, OrderBook};

use super::client::ApiClient;

#[tracing::instrument(skip(client))]
pub async fn list_markets(client: &ApiClient, query: &MarketQuery) -> Result<MarketList> {
    check_market_query(query)?;

    let url = client.endpoint(&["markets"])?;
    client.execute(client.http.get(url).query(query), "list_markets").await
}

#[tracing::instrument(skip(client))]
pub async fn market_detail(client: &ApiClient, slug: &str) -> Result<Market> {
    check_path_segment("slug", slug)?;

    let url = client.endpoint(&["markets", slug])?;
    client.execute(client.http.get(url), "market_detail").await
}

#[tracing::instrument(skip(client))]
pub async fn market_orderbook(client: &ApiClient, slug: &str) -> Result<OrderBook> {
    check_path_segment("slug", slug)?;

    let url = client.endpoint(&["markets", slug, "orderbook"])?;
    client.execute(client.http.get(url), "market_orderbook").await
}
