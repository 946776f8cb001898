//! # Wallet Endpoints
//!
//! Balances, withdrawals and admin review of pending withdrawals.

use lib_auth::BearerCredential;
use lib_core::contract::{check_path_segment, check_reject_reason, check_withdrawal, normalize_amount};
use lib_core::Result;
use shared::{Balance, RejectWithdrawalRequest, WithdrawalReceipt, WithdrawalRequest};
use tracing::info;

use super::client::ApiClient;

/// Role a credential must carry to review withdrawals.
pub const ADMIN_ROLE: &str = "admin";

#[tracing::instrument(skip(client, credential))]
pub async fn balances(client: &ApiClient, credential: &BearerCredential) -> Result<Vec<Balance>> {
    let url = client.endpoint(&["wallet", "balances"])?;
    let builder = client.with_bearer(client.http.get(url), credential)?;
    client.execute(builder, "balances").await
}

/// Request a withdrawal. The amount is rounded to the token's precision
/// before it is checked and sent.
#[tracing::instrument(skip(client, credential), fields(token = %request.token))]
pub async fn withdraw(client: &ApiClient, credential: &BearerCredential, request: &WithdrawalRequest) -> Result<WithdrawalReceipt> {
    let request = WithdrawalRequest {
        amount: normalize_amount(request.token, request.amount),
        ..request.clone()
    };
    check_withdrawal(&request)?;

    let body = client.json_body(&request)?;
    let url = client.endpoint(&["crypto", "withdraw"])?;
    let builder = client.with_bearer(client.http.post(url).json(&body), credential)?;
    let receipt: WithdrawalReceipt = client.execute(builder, "withdraw").await?;

    info!(withdrawal_id = %receipt.id, status = %receipt.status, "withdrawal requested");
    Ok(receipt)
}

/// Reject a pending withdrawal. Requires the `admin` role.
#[tracing::instrument(skip(client, credential, request))]
pub async fn reject_withdrawal(
    client: &ApiClient,
    credential: &BearerCredential,
    withdrawal_id: &str,
    request: &RejectWithdrawalRequest,
) -> Result<WithdrawalReceipt> {
    credential.require_role(ADMIN_ROLE)?;
    check_path_segment("withdrawalId", withdrawal_id)?;
    check_reject_reason(request)?;

    let body = client.json_body(request)?;
    let url = client.endpoint(&["admin", "crypto", "withdrawals", withdrawal_id, "reject"])?;
    let builder = client.with_bearer(client.http.post(url).json(&body), credential)?;
    client.execute(builder, "reject_withdrawal").await
}
