//! # API Client
//!
//! HTTP client for the remote market API.
//!
//! Every endpoint function in [`crate::api`] goes through the same three
//! steps: run the preflight contract check, send, then classify the response.
//! A non-2xx status becomes a [`ClientError`] through
//! [`ClientError::from_status`], with the server's message redacted before it
//! is stored.

use std::time::{Duration, Instant};

use lib_auth::{inspect_token, BearerCredential, CredentialPolicy};
use lib_core::contract::{inspect_payload, PayloadLimits, TradeLimits};
use lib_core::{sanitize_error, ClientConfig, ClientError, Result};
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::ErrorResponse;
use tracing::{debug, error, warn};
use url::Url;
use uuid::Uuid;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for communicating with the remote API.
///
/// Cheap to clone: clones share one connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) http: Client,
    base_url: Url,
    policy: CredentialPolicy,
    trade_limits: TradeLimits,
    payload_limits: PayloadLimits,
    pub(crate) max_retries: u32,
    pub(crate) retry_backoff: Duration,
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decoding(format!("Failed to parse response: {}", err))
    } else {
        ClientError::Transport(format!("Network error: {}", err.without_url()))
    }
}

impl ApiClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate().map_err(ClientError::Config)?;

        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ClientError::Config(format!("API_BASE_URL must be a valid URL: {}", e)))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            policy: config.credential_policy(),
            trade_limits: config.trade_limits(),
            payload_limits: PayloadLimits::default(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn trade_limits(&self) -> &TradeLimits {
        &self.trade_limits
    }

    /// Check a session token against the configured policy.
    pub fn authorize(&self, token: &str) -> Result<BearerCredential> {
        Ok(inspect_token(token, &self.policy)?)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach a credential, re-checking it first so an expired session is
    /// never sent.
    pub(crate) fn with_bearer(&self, builder: RequestBuilder, credential: &BearerCredential) -> Result<RequestBuilder> {
        let fresh = self.authorize(credential.token())?;
        Ok(builder.header(AUTHORIZATION, fresh.authorization_value()))
    }

    /// Serialize a body and apply the structural payload checks.
    pub(crate) fn json_body<B: Serialize>(&self, body: &B) -> Result<serde_json::Value> {
        let value = serde_json::to_value(body)?;
        inspect_payload(&value, &self.payload_limits)?;
        Ok(value)
    }

    /// Send and return the response when the status is a success.
    pub(crate) async fn send(&self, builder: RequestBuilder, op: &'static str) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let response = builder
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                error!(op, %request_id, error = %e, "network error");
                transport_error(e)
            })?;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            debug!(op, %request_id, status = status.as_u16(), duration_ms, "request succeeded");
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());

        let err = ClientError::from_status(status.as_u16(), sanitize_error(&message), retry_after);
        if err.is_server_fault() {
            error!(op, %request_id, status = status.as_u16(), duration_ms, "server fault");
        } else {
            warn!(op, %request_id, status = status.as_u16(), duration_ms, code = err.code(), "request rejected");
        }
        Err(err)
    }

    /// Send and decode a JSON response body.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder, op: &'static str) -> Result<T> {
        let response = self.send(builder, op).await?;
        response.json::<T>().await.map_err(|e| {
            error!(op, error = %e, "response parse error");
            ClientError::Decoding(format!("Failed to parse response: {}", e))
        })
    }
}
