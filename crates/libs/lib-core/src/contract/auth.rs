//! Preflight checks for the OTP and wallet-signature sign-in flows.

use lib_utils::{is_valid_eth_address, is_valid_otp, validate_email, validate_max_length, validate_not_empty};
use shared::dto::auth::{OtpRequest, OtpVerifyRequest, WalletChallengeRequest, WalletVerifyRequest};

use super::{field, ContractViolation, Preflight};

/// RFC 5321 path limit.
pub const MAX_EMAIL_LEN: usize = 254;

/// Longest challenge message the client will sign and submit.
pub const MAX_CHALLENGE_LEN: usize = 2048;

/// Hex digits in a 65-byte `r || s || v` signature.
const SIGNATURE_HEX_LEN: usize = 130;

fn check_email(email: &str) -> Preflight {
    field(validate_max_length(email, MAX_EMAIL_LEN, "Email"), "email")?;
    field(validate_email(email), "email")
}

pub fn check_otp_request(req: &OtpRequest) -> Preflight {
    check_email(&req.email)
}

pub fn check_otp_verify(req: &OtpVerifyRequest) -> Preflight {
    check_email(&req.email)?;
    if !is_valid_otp(&req.code) {
        return Err(ContractViolation::input("code", "Code must be exactly 6 digits"));
    }
    Ok(())
}

pub fn check_wallet_challenge(req: &WalletChallengeRequest) -> Preflight {
    if !is_valid_eth_address(&req.wallet_address) {
        return Err(ContractViolation::input("walletAddress", "Invalid wallet address"));
    }
    Ok(())
}

pub fn check_wallet_verify(req: &WalletVerifyRequest) -> Preflight {
    field(validate_not_empty(&req.message, "Message"), "message")?;
    field(validate_max_length(&req.message, MAX_CHALLENGE_LEN, "Message"), "message")?;

    let well_formed = req
        .signature
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == SIGNATURE_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()));
    if !well_formed {
        return Err(ContractViolation::input("signature", "Signature must be 65 bytes of 0x-prefixed hex"));
    }
    Ok(())
}
