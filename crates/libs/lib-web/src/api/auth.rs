//! # Authentication Endpoints
//!
//! Email OTP and wallet-signature sign-in.

use lib_core::contract::{check_otp_request, check_otp_verify, check_wallet_challenge, check_wallet_verify};
use lib_core::Result;
use shared::{AuthSession, OtpRequest, OtpVerifyRequest, WalletChallengeRequest, WalletChallengeResponse, WalletVerifyRequest};
use tracing::info;

use super::client::ApiClient;

/// Ask the API to email a one-time passcode.
#[tracing::instrument(skip(client))]
pub async fn request_otp(client: &ApiClient, email: &str) -> Result<()> {
    let request = OtpRequest {
        email: email.to_string(),
    };
    check_otp_request(&request)?;

    let body = client.json_body(&request)?;
    let url = client.endpoint(&["auth", "request-otp"])?;
    client.send(client.http.post(url).json(&body), "request_otp").await?;

    info!("OTP requested");
    Ok(())
}

/// Exchange an emailed passcode for a session.
#[tracing::instrument(skip(client, code))]
pub async fn verify_otp(client: &ApiClient, email: &str, code: &str) -> Result<AuthSession> {
    let request = OtpVerifyRequest {
        email: email.to_string(),
        code: code.to_string(),
    };
    check_otp_verify(&request)?;

    let body = client.json_body(&request)?;
    let url = client.endpoint(&["auth", "verify-otp"])?;
    let session: AuthSession = client.execute(client.http.post(url).json(&body), "verify_otp").await?;

    info!(user_id = ?session.user_id, "OTP sign-in successful");
    Ok(session)
}

#[tracing::instrument(skip(client))]
pub async fn wallet_challenge(client: &ApiClient, wallet_address: &str) -> Result<WalletChallengeResponse> {
    let request = WalletChallengeRequest {
        wallet_address: wallet_address.to_string(),
    };
    check_wallet_challenge(&request)?;

    let body = client.json_body(&request)?;
    let url = client.endpoint(&["auth", "wallet", "challenge"])?;
    client.execute(client.http.post(url).json(&body), "wallet_challenge").await
}

#[tracing::instrument(skip(client, message, signature))]
pub async fn wallet_verify(client: &ApiClient, message: &str, signature: &str) -> Result<AuthSession> {
    let request = WalletVerifyRequest {
        message: message.to_string(),
        signature: signature.to_string(),
    };
    check_wallet_verify(&request)?;

    let body = client.json_body(&request)?;
    let url = client.endpoint(&["auth", "wallet", "verify"])?;
    let session: AuthSession = client.execute(client.http.post(url).json(&body), "wallet_verify").await?;

    info!(user_id = ?session.user_id, "wallet sign-in successful");
    Ok(session)
}
