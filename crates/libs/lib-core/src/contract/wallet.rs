//! Withdrawal and admin rejection preflight.
//!
//! Destination addresses get the strictest treatment in the contract: a
//! mistyped address loses funds irrecoverably, so beyond the format rule the
//! zero address is refused and mixed-case input must carry a valid EIP-55
//! checksum.

use std::str::FromStr;

use alloy_primitives::Address;
use lib_utils::{is_valid_amount, is_valid_eth_address, round_to_decimals, validate_max_length, validate_not_empty};
use shared::dto::wallet::{CryptoToken, RejectWithdrawalRequest, WithdrawalRequest};

use super::{field, ContractViolation, Preflight};

/// Longest rejection reason an admin may record.
pub const MAX_REASON_LEN: usize = 500;

/// Smallest withdrawal the platform processes per token.
pub fn minimum_withdrawal(token: CryptoToken) -> f64 {
    match token {
        CryptoToken::Eth => 0.001,
        CryptoToken::Usdc | CryptoToken::Usdt => 5.0,
    }
}

/// Decimal places kept when sending an amount.
fn amount_decimals(token: CryptoToken) -> u32 {
    match token {
        CryptoToken::Eth => 8,
        CryptoToken::Usdc | CryptoToken::Usdt => 6,
    }
}

/// Parse a token symbol as typed by a user (`eth`, ` USDC `).
pub fn parse_token(symbol: &str) -> Result<CryptoToken, ContractViolation> {
    CryptoToken::from_str(&symbol.trim().to_ascii_uppercase())
        .map_err(|_| ContractViolation::input("token", "Currency must be one of ETH, USDC, USDT"))
}

/// Round an amount to the precision the token supports.
pub fn normalize_amount(token: CryptoToken, amount: f64) -> f64 {
    round_to_decimals(amount, amount_decimals(token))
}

fn check_destination(address: &str) -> Preflight {
    const FIELD: &str = "destinationAddress";

    if !is_valid_eth_address(address) {
        return Err(ContractViolation::input(FIELD, "Invalid wallet address"));
    }
    let parsed = Address::from_str(address)
        .map_err(|_| ContractViolation::input(FIELD, "Invalid wallet address"))?;
    if parsed.is_zero() {
        return Err(ContractViolation::input(FIELD, "Cannot withdraw to the zero address"));
    }

    let hex = &address[2..];
    let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase()) && hex.bytes().any(|b| b.is_ascii_lowercase());
    if mixed_case && parsed.to_checksum(None) != address {
        return Err(ContractViolation::input(FIELD, "Address checksum mismatch"));
    }
    Ok(())
}

pub fn check_withdrawal(req: &WithdrawalRequest) -> Preflight {
    let amount = req.amount;
    if !is_valid_amount(amount) || amount <= 0.0 {
        return Err(ContractViolation::input("amount", "Amount must be a positive finite number"));
    }
    let minimum = minimum_withdrawal(req.token);
    if amount < minimum {
        return Err(ContractViolation::input(
            "amount",
            format!("Minimum withdrawal is {minimum} {}", req.token),
        ));
    }
    check_destination(&req.destination_address)
}

pub fn check_reject_reason(req: &RejectWithdrawalRequest) -> Preflight {
    field(validate_not_empty(&req.reason, "Reason"), "reason")?;
    field(validate_max_length(&req.reason, MAX_REASON_LEN, "Reason"), "reason")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

    fn withdrawal(token: CryptoToken, amount: f64, to: &str) -> WithdrawalRequest {
        WithdrawalRequest {
            token,
            amount,
            destination_address: to.to_string(),
        }
    }

    #[test]
    fn test_withdrawal_amounts() {
        let to = "0x1234567890123456789012345678901234567890";
        assert!(check_withdrawal(&withdrawal(CryptoToken::Eth, 0.5, to)).is_ok());
        assert!(check_withdrawal(&withdrawal(CryptoToken::Usdc, 5.0, to)).is_ok());

        for bad in [0.0, -100.0, f64::NAN, f64::INFINITY, 1e16] {
            let err = check_withdrawal(&withdrawal(CryptoToken::Eth, bad, to)).unwrap_err();
            assert_eq!(err.field, "amount", "amount {bad}");
        }

        let err = check_withdrawal(&withdrawal(CryptoToken::Usdt, 4.99, to)).unwrap_err();
        assert!(err.message.contains("USDT"));
        assert!(check_withdrawal(&withdrawal(CryptoToken::Eth, 0.0001, to)).is_err());
    }

    #[test]
    fn test_withdrawal_destination() {
        let ok = |to: &str| check_withdrawal(&withdrawal(CryptoToken::Eth, 1.0, to));

        assert!(ok(CHECKSUMMED).is_ok());
        assert!(ok(&CHECKSUMMED.to_ascii_lowercase()).is_ok());
        assert!(ok(&format!("0x{}", CHECKSUMMED[2..].to_ascii_uppercase())).is_ok());

        let flipped = CHECKSUMMED.replacen("Ab58", "ab58", 1);
        assert_eq!(ok(&flipped).unwrap_err().message, "Address checksum mismatch");

        assert!(ok("0x0000000000000000000000000000000000000000").is_err());
        assert!(ok("invalid").is_err());
        assert!(ok("0x123").is_err());
        assert!(ok("").is_err());
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("eth").unwrap(), CryptoToken::Eth);
        assert_eq!(parse_token(" USDC ").unwrap(), CryptoToken::Usdc);
        assert!(parse_token("INVALID_TOKEN").is_err());
        assert!(parse_token("").is_err());
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount(CryptoToken::Usdc, 10.1234567), 10.123457);
        assert_eq!(normalize_amount(CryptoToken::Eth, 0.123456789), 0.12345679);
    }

    #[test]
    fn test_reject_reason() {
        let req = |reason: &str| RejectWithdrawalRequest {
            reason: reason.to_string(),
        };
        assert!(check_reject_reason(&req("Suspicious destination")).is_ok());
        assert!(check_reject_reason(&req("   ")).is_err());
        assert!(check_reject_reason(&req(&"x".repeat(501))).is_err());
    }
}
