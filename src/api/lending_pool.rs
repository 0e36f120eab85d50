// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lending pool endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::Quantity;
use crate::{
    auth::Auth,
    services::{ReadOutcome, WriteOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UserDataQuery {
    /// Lending pool contract address
    pub contract: String,
    /// Account to report on
    pub user: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub contract: String,
    pub asset: String,
    pub amount: Quantity,
    /// Defaults to the pool contract
    #[serde(default)]
    pub on_behalf_of: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub contract: String,
    pub asset: String,
    pub amount: Quantity,
    /// Defaults to the pool contract
    #[serde(default)]
    pub to: Option<String>,
}

/// Body of both `borrow` and `repay`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub contract: String,
    pub asset: String,
    pub amount: Quantity,
    pub interest_rate_mode: Quantity,
    /// Defaults to the pool contract
    #[serde(default)]
    pub on_behalf_of: Option<String>,
}

#[utoipa::path(
    get,
    path = "/lending-pool/user-data",
    tag = "LendingPool",
    params(UserDataQuery),
    responses(
        (status = 200, description = "Account data, null, or an informational stub", body = Object)
    )
)]
pub async fn user_data(State(state): State<AppState>, Query(query): Query<UserDataQuery>) -> ReadOutcome {
    state
        .services
        .lending_pool
        .user_account_data(&query.contract, &query.user)
        .await
}

#[utoipa::path(
    post,
    path = "/lending-pool/deposit",
    tag = "LendingPool",
    security(("bearer" = [])),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Arguments do not match the contract interface"),
        (status = 502, description = "Submission or confirmation failed"),
        (status = 503, description = "Signing credential or interface unavailable"),
        (status = 504, description = "Confirmation timed out")
    )
)]
pub async fn deposit(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "lending pool deposit");
    state
        .services
        .lending_pool
        .deposit(&req.contract, &req.asset, req.amount.into(), req.on_behalf_of.as_deref())
        .await
}

#[utoipa::path(
    post,
    path = "/lending-pool/withdraw",
    tag = "LendingPool",
    security(("bearer" = [])),
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn withdraw(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "lending pool withdraw");
    state
        .services
        .lending_pool
        .withdraw(&req.contract, &req.asset, req.amount.into(), req.to.as_deref())
        .await
}

#[utoipa::path(
    post,
    path = "/lending-pool/borrow",
    tag = "LendingPool",
    security(("bearer" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn borrow(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<BorrowRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "lending pool borrow");
    state
        .services
        .lending_pool
        .borrow(
            &req.contract,
            &req.asset,
            req.amount.into(),
            req.interest_rate_mode.into(),
            req.on_behalf_of.as_deref(),
        )
        .await
}

#[utoipa::path(
    post,
    path = "/lending-pool/repay",
    tag = "LendingPool",
    security(("bearer" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn repay(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<BorrowRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "lending pool repay");
    state
        .services
        .lending_pool
        .repay(
            &req.contract,
            &req.asset,
            req.amount.into(),
            req.interest_rate_mode.into(),
            req.on_behalf_of.as_deref(),
        )
        .await
}

#[cfg(test)]
mod tests {
    use crate::api::{
        router,
        testing::{bearer, send},
    };
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter};
    use crate::services::NETWORK_UNREACHABLE_INFO;
    use crate::state::{test_state, test_state_with};
    use axum::http::StatusCode;
    use serde_json::json;

    const POOL: &str = "0x1111111111111111111111111111111111111111";
    const ASSET: &str = "0x2222222222222222222222222222222222222222";

    #[tokio::test]
    async fn deposit_requires_a_session() {
        let (state, _dir) = test_state();
        let body = json!({ "contract": POOL, "asset": ASSET, "amount": 1 });
        let (status, _) = send(router(state), "POST", "/lending-pool/deposit", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deposit_returns_the_transaction_outcome() {
        let (state, _dir) = test_state();
        let auth = bearer(&state);
        let body = json!({ "contract": POOL, "asset": ASSET, "amount": "250" });

        let (status, outcome) =
            send(router(state), "POST", "/lending-pool/deposit", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(outcome["transaction_hash"].as_str().unwrap().starts_with("0x"));
        assert_eq!(outcome["receipt"]["status"], true);
        assert_eq!(outcome["events"], json!([]));
    }

    #[tokio::test]
    async fn submission_failure_maps_to_bad_gateway() {
        let (state, _dir) = test_state_with(gateway(
            MockSubmitter::new(Behaviour::RejectSubmission),
            Some(credential()),
        ));
        let auth = bearer(&state);
        let body = json!({ "contract": POOL, "asset": ASSET, "amount": 1, "interestRateMode": 2 });

        let (status, error) =
            send(router(state), "POST", "/lending-pool/borrow", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error["error_code"], "submission_failed");
    }

    #[tokio::test]
    async fn missing_credential_maps_to_service_unavailable() {
        let (state, _dir) = test_state_with(gateway(MockSubmitter::new(Behaviour::Hang), None));
        let auth = bearer(&state);
        let body = json!({ "contract": POOL, "asset": ASSET, "amount": 1 });

        let (status, error) =
            send(router(state), "POST", "/lending-pool/withdraw", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error["error_code"], "missing_credential");
    }

    #[tokio::test]
    async fn user_data_without_rpc_is_informational() {
        let (state, _dir) = test_state();
        let uri = format!("/lending-pool/user-data?contract={POOL}&user={ASSET}");
        let (status, body) = send(router(state), "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "info": NETWORK_UNREACHABLE_INFO }));
    }
}
