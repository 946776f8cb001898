//! # Client Configuration
//!
//! This module manages client configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Rule |
//! |----------|---------|------|
//! | `API_BASE_URL` | `http://127.0.0.1:3001/api/v1` | http(s) URL |
//! | `API_TIMEOUT_SECS` | `10` | 1-120 |
//! | `MAX_STAKE` | `100000` | positive, at most 2^53 - 1 |
//! | `MAX_RETRIES` | `3` | at most 10 |
//! | `RETRY_BACKOFF_MS` | `250` | at most 60000 |
//! | `AUTH_ALLOWED_ALGS` | `RS256,ES256` | known algorithms, never `none` |
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let base_url = &config.api_base_url;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use std::sync::OnceLock;
use std::time::Duration;

use lib_auth::CredentialPolicy;
use lib_utils::{get_env_list, get_env_or, get_env_parse_or, MAX_SAFE_INTEGER};
use tracing::info;
use url::Url;

use crate::contract::trade::DEFAULT_MAX_STAKE;
use crate::contract::TradeLimits;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001/api/v1";
const DEFAULT_ALLOWED_ALGS: [&str; 2] = ["RS256", "ES256"];

/// Client configuration loaded from environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: String,

    /// Per-request timeout in seconds
    ///
    /// Valid range: 1-120
    pub api_timeout_secs: u64,

    /// Platform cap on a single stake, in USD
    pub max_stake: f64,

    /// Extra attempts for a retryable trade failure
    pub max_retries: u32,

    /// Base delay between retries, doubled per attempt
    pub retry_backoff_ms: u64,

    /// Signing algorithms a bearer credential may use
    pub allowed_algorithms: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_secs: 10,
            max_stake: DEFAULT_MAX_STAKE,
            max_retries: 3,
            retry_backoff_ms: 250,
            allowed_algorithms: DEFAULT_ALLOWED_ALGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        Ok(Self {
            api_base_url: get_env_or("API_BASE_URL", DEFAULT_API_BASE_URL),
            api_timeout_secs: get_env_parse_or("API_TIMEOUT_SECS", defaults.api_timeout_secs)
                .map_err(|e| e.to_string())?,
            max_stake: get_env_parse_or("MAX_STAKE", defaults.max_stake).map_err(|e| e.to_string())?,
            max_retries: get_env_parse_or("MAX_RETRIES", defaults.max_retries).map_err(|e| e.to_string())?,
            retry_backoff_ms: get_env_parse_or("RETRY_BACKOFF_MS", defaults.retry_backoff_ms)
                .map_err(|e| e.to_string())?,
            allowed_algorithms: get_env_list("AUTH_ALLOWED_ALGS", &DEFAULT_ALLOWED_ALGS),
        })
    }

    /// Validate configuration values against safety rules.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| format!("API_BASE_URL must be a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("API_BASE_URL must use http or https".to_string());
        }
        if url.cannot_be_a_base() {
            return Err("API_BASE_URL must be a base URL".to_string());
        }

        if self.api_timeout_secs < 1 || self.api_timeout_secs > 120 {
            return Err("API_TIMEOUT_SECS must be between 1 and 120".to_string());
        }

        if !self.max_stake.is_finite() || self.max_stake <= 0.0 || self.max_stake > MAX_SAFE_INTEGER {
            return Err("MAX_STAKE must be positive and at most 9007199254740991".to_string());
        }

        if self.max_retries > 10 {
            return Err("MAX_RETRIES must be at most 10".to_string());
        }

        if self.retry_backoff_ms > 60_000 {
            return Err("RETRY_BACKOFF_MS must be at most 60000".to_string());
        }

        if self.allowed_algorithms.is_empty() {
            return Err("AUTH_ALLOWED_ALGS must name at least one algorithm".to_string());
        }
        CredentialPolicy::from_names(self.allowed_algorithms.as_slice())
            .map_err(|e| format!("AUTH_ALLOWED_ALGS is invalid: {}", e))?;

        Ok(())
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        CredentialPolicy::from_names(self.allowed_algorithms.as_slice()).unwrap_or_default()
    }

    pub fn trade_limits(&self) -> TradeLimits {
        TradeLimits {
            max_stake: self.max_stake,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are set but unparsable
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = ClientConfig::from_env()?;
    config.validate()?;
    info!(
        base_url = %config.api_base_url,
        timeout_secs = config.api_timeout_secs,
        max_retries = config.max_retries,
        "client config loaded"
    );

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static ClientConfig {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.trade_limits().max_stake, 100_000.0);
        assert_eq!(config.credential_policy().allowed_algorithms.len(), 2);
    }

    #[test]
    fn test_validation_rules() {
        let with = |f: fn(&mut ClientConfig)| {
            let mut config = ClientConfig::default();
            f(&mut config);
            config.validate()
        };

        assert!(with(|c| c.api_base_url = "not a url".into()).is_err());
        assert!(with(|c| c.api_base_url = "ftp://example.com".into()).is_err());
        assert!(with(|c| c.api_base_url = "https://api.example.com/v1".into()).is_ok());
        assert!(with(|c| c.api_timeout_secs = 0).is_err());
        assert!(with(|c| c.api_timeout_secs = 121).is_err());
        assert!(with(|c| c.max_stake = 0.0).is_err());
        assert!(with(|c| c.max_stake = f64::INFINITY).is_err());
        assert!(with(|c| c.max_stake = 1e16).is_err());
        assert!(with(|c| c.max_retries = 11).is_err());
        assert!(with(|c| c.retry_backoff_ms = 60_001).is_err());
        assert!(with(|c| c.allowed_algorithms = vec!["none".into()]).is_err());
        assert!(with(|c| c.allowed_algorithms = vec!["RS999".into()]).is_err());
        assert!(with(|c| c.allowed_algorithms = vec![]).is_err());
    }
}
