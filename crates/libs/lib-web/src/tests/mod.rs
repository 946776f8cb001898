//! # Mock API
//!
//! In-process stand-ins for the remote API, served on an ephemeral port so
//! every request travels through reqwest and hyper for real.
//!
//! - [`compliant_app`] honours every boundary of the request contract.
//! - [`faulty_app`] breaks several on purpose.


use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lib_auth::{inspect_bearer, Claims, CredentialPolicy};
use lib_core::contract::{
    check_market_query, check_otp_request, check_otp_verify, check_reject_reason, check_trade_buy,
    check_trade_preview, check_trade_sell, check_wallet_challenge, check_wallet_verify, check_withdrawal,
    expect_scalar, inspect_payload, PayloadLimits, TradeLimits,
};
use lib_core::{ClientConfig, ContractViolation};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::*;

// region:    --- Fixtures

pub const SECRET: &[u8] = b"mock-api-secret-must-be-32-bytes-long";
pub const PREFIX: &str = "/api/v1";
pub const OPEN_MARKET: &str = "will-it-rain";
pub const CLOSED_MARKET: &str = "last-years-election";
pub const RESOLVED_MARKET: &str = "who-won-2020";
const MARKETS: [&str; 3] = [OPEN_MARKET, CLOSED_MARKET, RESOLVED_MARKET];
pub const OTP_EMAIL: &str = "test@example.com";
pub const OTP_CODE: &str = "123456";
pub const CHECKSUMMED: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

/// Paths the mock guards even when no route matches.
const PROTECTED_PREFIXES: [&str; 5] = ["/admin", "/portfolio", "/users", "/crypto", "/wallet"];

pub fn mint_with_secret(secret: &[u8], role: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: Some("user-1".to_string()),
        exp: Some(now + ttl_secs),
        iat: Some(now),
        role: Some(role.to_string()),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

pub fn mint(role: &str) -> String {
    mint_with_secret(SECRET, role, 3600)
}

/// Client config pointed at a mock. The mock signs with HS256.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_string(),
        allowed_algorithms: vec!["HS256".to_string()],
        retry_backoff_ms: 1,
        ..ClientConfig::default()
    }
}

fn market(slug: &str) -> Option<Market> {
    let status = match slug {
        OPEN_MARKET => MarketStatus::Open,
        CLOSED_MARKET => MarketStatus::Closed,
        RESOLVED_MARKET => MarketStatus::Resolved,
        _ => return None,
    };
    Some(Market {
        id: slug.to_string(),
        slug: slug.to_string(),
        question: format!("Market {slug}?"),
        status,
        category: Some("Weather".to_string()),
        country: None,
        yes_price: Some(0.4),
        closes_at: None,
    })
}

// endregion: --- Fixtures

// region:    --- Mock State

#[derive(Default)]
pub struct MockState {
    /// Positions by idempotency key
    pub buys: Mutex<HashMap<String, Position>>,
    /// Key of every buy that passed authentication, in arrival order
    pub seen_keys: Mutex<Vec<String>>,
    /// Buys still to answer with 429
    pub fail_buys: AtomicU32,
}

pub type SharedState = Arc<MockState>;

// endregion: --- Mock State

// region:    --- Helpers

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn reject(violation: ContractViolation) -> Response {
    error(StatusCode::BAD_REQUEST, &violation.message)
}

fn authorize(headers: &HeaderMap) -> Result<Claims, Response> {
    let unauthorized = || error(StatusCode::UNAUTHORIZED, "Authentication required");
    let raw = headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());
    let policy = CredentialPolicy::from_names(&["HS256"]).unwrap();
    let credential = inspect_bearer(raw, &policy).map_err(|_| unauthorized())?;
    decode::<Claims>(credential.token(), &DecodingKey::from_secret(SECRET), &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|_| unauthorized())
}

fn parse_json(headers: &HeaderMap, body: &Bytes) -> Result<Value, Response> {
    let limits = PayloadLimits::default();
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if !is_json {
        return Err(error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Content-Type must be application/json"));
    }
    if body.len() > limits.max_bytes {
        return Err(error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large"));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid JSON body"))?;
    inspect_payload(&value, &limits).map_err(reject)?;
    Ok(value)
}

fn typed<T: DeserializeOwned>(value: Value) -> Result<T, Response> {
    serde_json::from_value(value).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid request body"))
}

// endregion: --- Helpers

// region:    --- Compliant Handlers

type Reply = Result<Response, Response>;

async fn request_otp(headers: HeaderMap, body: Bytes) -> Reply {
    let value = parse_json(&headers, &body)?;
    if let Some(email) = value.get("email") {
        expect_scalar(email, "email").map_err(reject)?;
    }
    let request: OtpRequest = typed(value)?;
    check_otp_request(&request).map_err(reject)?;
    Ok(Json(json!({ "message": "OTP sent" })).into_response())
}

async fn verify_otp(headers: HeaderMap, body: Bytes) -> Reply {
    let request: OtpVerifyRequest = typed(parse_json(&headers, &body)?)?;
    check_otp_verify(&request).map_err(reject)?;
    if request.email != OTP_EMAIL || request.code != OTP_CODE {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid or expired code"));
    }
    let session = AuthSession {
        token: mint("user"),
        user_id: Some("user-1".to_string()),
        expires_at: None,
    };
    Ok(Json(session).into_response())
}

async fn wallet_challenge(headers: HeaderMap, body: Bytes) -> Reply {
    let request: WalletChallengeRequest = typed(parse_json(&headers, &body)?)?;
    check_wallet_challenge(&request).map_err(reject)?;
    let challenge = WalletChallengeResponse {
        message: format!("Sign in as {}\nNonce: 42", request.wallet_address),
    };
    Ok(Json(challenge).into_response())
}

async fn wallet_verify(headers: HeaderMap, body: Bytes) -> Reply {
    let request: WalletVerifyRequest = typed(parse_json(&headers, &body)?)?;
    check_wallet_verify(&request).map_err(reject)?;
    Err(error(StatusCode::UNAUTHORIZED, "Invalid signature"))
}

async fn list_markets(RawQuery(query): RawQuery) -> Reply {
    let mut market_query = MarketQuery::default();
    for pair in query.as_deref().unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let number = || value.parse::<u32>().map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid pagination"));
        match key {
            "limit" => market_query.limit = Some(number()?),
            "offset" => market_query.offset = Some(number()?),
            "status" => {
                let status = serde_json::from_value(json!(value))
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid status"))?;
                market_query.status = Some(status);
            }
            _ => {}
        }
    }
    check_market_query(&market_query).map_err(reject)?;

    let matching: Vec<Market> = MARKETS
        .into_iter()
        .filter_map(market)
        .filter(|m| market_query.status.is_none_or(|status| m.status == status))
        .collect();
    let total = matching.len() as u64;
    let markets = matching
        .into_iter()
        .skip(market_query.offset.unwrap_or(0) as usize)
        .take(market_query.limit.unwrap_or(20) as usize)
        .collect();
    Ok(Json(MarketList { markets, total }).into_response())
}

async fn market_detail(Path(slug): Path<String>) -> Reply {
    let market = market(&slug).ok_or_else(|| error(StatusCode::NOT_FOUND, "Market not found"))?;
    Ok(Json(market).into_response())
}

async fn market_orderbook(Path(slug): Path<String>) -> Reply {
    let market = market(&slug).ok_or_else(|| error(StatusCode::NOT_FOUND, "Market not found"))?;
    let book = OrderBook {
        market_id: market.id,
        bids: vec![PriceLevel { price: 0.39, size: 120.0 }],
        asks: vec![PriceLevel { price: 0.41, size: 80.0 }],
    };
    Ok(Json(book).into_response())
}

fn open_market(market_id: &str) -> Result<Market, Response> {
    let market = market(market_id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Market not found"))?;
    if market.status != MarketStatus::Open {
        return Err(error(StatusCode::BAD_REQUEST, "Market is not open"));
    }
    Ok(market)
}

async fn trade_preview(headers: HeaderMap, body: Bytes) -> Reply {
    let request: TradePreviewRequest = typed(parse_json(&headers, &body)?)?;
    check_trade_preview(&request, &TradeLimits::default()).map_err(reject)?;
    let market = open_market(&request.market_id)?;
    let price = market.yes_price.unwrap_or(0.5);
    let shares = request.stake / price;
    Ok(Json(TradePreview {
        shares,
        avg_price: price,
        potential_payout: shares,
    })
    .into_response())
}

async fn trade_buy(State(state): State<SharedState>, headers: HeaderMap, body: Bytes) -> Reply {
    authorize(&headers)?;
    let request: TradeBuyRequest = typed(parse_json(&headers, &body)?)?;
    check_trade_buy(&request, &TradeLimits::default()).map_err(reject)?;

    state.seen_keys.lock().unwrap().push(request.idempotency_key.clone());
    if state
        .fail_buys
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        let limited = error(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
        return Err(([(header::RETRY_AFTER, "0")], limited).into_response());
    }

    let market = open_market(&request.market_id)?;
    let mut buys = state.buys.lock().unwrap();
    let next_id = buys.len() + 1;
    let position = buys
        .entry(request.idempotency_key.clone())
        .or_insert_with(|| Position {
            id: format!("pos-{next_id}"),
            market_id: market.id,
            outcome: request.outcome,
            shares: request.stake / 0.4,
            cost_basis: request.stake,
        })
        .clone();
    Ok(Json(position).into_response())
}

async fn trade_sell(State(state): State<SharedState>, headers: HeaderMap, body: Bytes) -> Reply {
    authorize(&headers)?;
    let request: TradeSellRequest = typed(parse_json(&headers, &body)?)?;
    check_trade_sell(&request).map_err(reject)?;

    let buys = state.buys.lock().unwrap();
    let position = buys
        .values()
        .find(|p| p.id == request.position_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Position not found"))?;
    if request.shares_to_sell > position.shares {
        return Err(error(StatusCode::BAD_REQUEST, "Not enough shares"));
    }
    Ok(Json(SellReceipt {
        position_id: position.id.clone(),
        shares_sold: request.shares_to_sell,
        proceeds: request.shares_to_sell * 0.41,
    })
    .into_response())
}

async fn balances(headers: HeaderMap) -> Reply {
    authorize(&headers)?;
    let balances = vec![Balance {
        token: CryptoToken::Usdc,
        available: 100.0,
        locked: 0.0,
    }];
    Ok(Json(balances).into_response())
}

async fn withdraw(headers: HeaderMap, body: Bytes) -> Reply {
    authorize(&headers)?;
    let request: WithdrawalRequest = typed(parse_json(&headers, &body)?)?;
    check_withdrawal(&request).map_err(reject)?;
    Ok(Json(WithdrawalReceipt {
        id: "wd-1".to_string(),
        status: "pending".to_string(),
    })
    .into_response())
}

async fn reject_withdrawal(Path(id): Path<String>, headers: HeaderMap, body: Bytes) -> Reply {
    let claims = authorize(&headers)?;
    if claims.role.as_deref() != Some("admin") {
        return Err(error(StatusCode::FORBIDDEN, "Admin access required"));
    }
    let request: RejectWithdrawalRequest = typed(parse_json(&headers, &body)?)?;
    check_reject_reason(&request).map_err(reject)?;
    Ok(Json(WithdrawalReceipt {
        id,
        status: "rejected".to_string(),
    })
    .into_response())
}

async fn fallback(uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path());
    if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        if let Err(unauthorized) = authorize(&headers) {
            return unauthorized;
        }
    }
    error(StatusCode::NOT_FOUND, "Not found")
}

// endregion: --- Compliant Handlers

// region:    --- Apps

fn p(path: &str) -> String {
    format!("{PREFIX}{path}")
}

pub fn compliant_app(state: SharedState) -> Router {
    Router::new()
        .route(&p("/auth/request-otp"), post(request_otp))
        .route(&p("/auth/verify-otp"), post(verify_otp))
        .route(&p("/auth/wallet/challenge"), post(wallet_challenge))
        .route(&p("/auth/wallet/verify"), post(wallet_verify))
        .route(&p("/markets"), get(list_markets))
        .route(&p("/markets/{slug}"), get(market_detail))
        .route(&p("/markets/{slug}/orderbook"), get(market_orderbook))
        .route(&p("/trade/preview"), post(trade_preview))
        .route(&p("/trade/buy"), post(trade_buy))
        .route(&p("/trade/sell"), post(trade_sell))
        .route(&p("/wallet/balances"), get(balances))
        .route(&p("/crypto/withdraw"), post(withdraw))
        .route(&p("/admin/crypto/withdrawals/{id}/reject"), post(reject_withdrawal))
        .fallback(fallback)
        .with_state(state)
}

const LEAKED_TRACE: &str = "TypeError: Cannot read properties of undefined (reading 'slug')\n    at Object.handler (/app/node_modules/express/lib/router/layer.js:95:5)";

/// Accepts any token, crashes on slugs, leaks data and advertises itself.
pub fn faulty_app() -> Router {
    Router::new()
        .route(&p("/wallet/balances"), get(|| async { Json(json!([])) }))
        .route(
            &p("/markets"),
            get(|| async { Json(json!({ "markets": [{ "slug": CLOSED_MARKET }], "total": 1 })) }),
        )
        .route(
            &p("/markets/{slug}"),
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, LEAKED_TRACE) }),
        )
        .route(
            &p("/markets/{slug}/orderbook"),
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal error" }))) }),
        )
        .route(
            &p("/trade/sell"),
            post(|| async { (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden", "shares": 10 }))) }),
        )
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                [("x-powered-by", "Express")],
                Json(json!({ "error": "Not found" })),
            )
        })
}

/// Serve on an ephemeral port and return the API base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{PREFIX}")
}

pub async fn spawn_compliant() -> (String, SharedState) {
    let state = SharedState::default();
    let base_url = serve(compliant_app(state.clone())).await;
    (base_url, state)
}

// endregion: --- Apps
