//! # Validation Utilities
//!
//! Input validation helpers shared by the request contract checker.
//!
//! Two flavours live here:
//!
//! - **Predicates** (`is_valid_*`): total functions returning `bool`. They never
//!   panic and accept any input.
//! - **Field validators** (`validate_*`): return a human readable message naming
//!   the offending field, used when a rejection has to be reported to a caller.
//!
//! The predicates mirror the format rules the remote API enforces:
//!
//! | Predicate | Rule |
//! |-----------|------|
//! | [`is_valid_email`] | `^[^\s@]+@[^\s@]+\.[^\s@]+$` |
//! | [`is_valid_eth_address`] | `^0x[a-fA-F0-9]{40}$` |
//! | [`is_valid_otp`] | `^\d{6}$` |
//! | [`is_valid_stake`] | finite and `> 0` |
//! | [`is_valid_amount`] | finite, `>= 0`, `<= MAX_SAFE_INTEGER` |

/// Largest integer a JSON number can carry without losing precision (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Length of the hex body of an Ethereum address (without the `0x` prefix).
const ETH_ADDRESS_HEX_LEN: usize = 40;

/// Number of digits in a one-time passcode.
const OTP_LEN: usize = 6;

// region:    --- Predicates

/// Whitespace as understood by `\s` in the browser regex engine.
///
/// Unicode `White_Space` plus U+FEFF, minus U+0085 (NEL).
fn is_regex_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

/// Validate email format.
///
/// Exactly one `@`, a non-empty local part, and a domain with a dot that is
/// neither its first nor its last character. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_regex_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || domain.len() < 3 {
        return false;
    }

    // Dot must have at least one character on either side.
    let inner = &domain[domain.char_indices().nth(1).map_or(domain.len(), |(i, _)| i)..];
    let inner = match inner.char_indices().last() {
        Some((i, _)) => &inner[..i],
        None => inner,
    };
    inner.contains('.')
}

/// Validate Ethereum address format: `0x` followed by exactly 40 hex digits.
///
/// Case-insensitive; checksum verification is the contract checker's concern.
pub fn is_valid_eth_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == ETH_ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validate a one-time passcode: exactly six ASCII digits.
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == OTP_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a trade stake. Zero, negative, NaN and infinities are all invalid.
pub fn is_valid_stake(stake: f64) -> bool {
    !stake.is_nan() && stake.is_finite() && stake > 0.0
}

/// Validate a balance-style amount.
///
/// Unlike [`is_valid_stake`] this accepts zero.
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0 && amount <= MAX_SAFE_INTEGER
}

/// Round to a fixed number of decimal places, half away from zero.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// endregion: --- Predicates

// region:    --- Field Validators

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate email format, reporting a message on failure.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if is_valid_email(email) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate minimum length (in characters).
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate maximum length (in characters).
pub fn validate_max_length(value: &str, max: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() > max {
        Err(format!("{} must be at most {} characters", field_name, max))
    } else {
        Ok(())
    }
}

// endregion: --- Field Validators
