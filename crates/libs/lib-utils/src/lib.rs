//! # Utilities Library
//!
//! Shared utility functions for environment variables, input validation, and
//! display sanitization.

pub mod envs;
pub mod sanitize;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_list, get_env_or, get_env_parse_or};
pub use sanitize::{escape_html, is_dangerous_url, path_segment_hazard, safe_link, PathHazard, SanitizedText};
pub use validation::{
    is_valid_amount, is_valid_email, is_valid_eth_address, is_valid_otp, is_valid_stake,
    round_to_decimals, validate_email, validate_max_length, validate_min_length,
    validate_not_empty, MAX_SAFE_INTEGER,
};
