// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Interest-bearing token endpoints.

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
pub struct ScaledBalanceQuery {
    /// Interest token contract address
    pub contract: String,
    pub user: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = interest_token::MintRequest)]
pub struct MintRequest {
    pub contract: String,
    pub to: String,
    pub amount: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = interest_token::BurnRequest)]
pub struct BurnRequest {
    pub contract: String,
    pub from: String,
    pub amount: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetLiquidityRequest {
    pub contract: String,
    /// Ray-scaled liquidity index
    pub new_index: Quantity,
}

#[utoipa::path(
    get,
    path = "/interest-token/scaled-balance",
    tag = "InterestToken",
    params(ScaledBalanceQuery),
    responses(
        (status = 200, description = "Scaled balance, null, or an informational stub", body = Object)
    )
)]
pub async fn scaled_balance(
    State(state): State<AppState>,
    Query(query): Query<ScaledBalanceQuery>,
) -> ReadOutcome {
    state
        .services
        .interest_token
        .scaled_balance(&query.contract, &query.user)
        .await
}

#[utoipa::path(
    post,
    path = "/interest-token/mint",
    tag = "InterestToken",
    security(("bearer" = [])),
    request_body = MintRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn mint(Auth(caller): Auth, State(state): State<AppState>, Json(req): Json<MintRequest>) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, to = %req.to, "interest token mint");
    state
        .services
        .interest_token
        .mint(&req.contract, &req.to, req.amount.into())
        .await
}

#[utoipa::path(
    post,
    path = "/interest-token/burn",
    tag = "InterestToken",
    security(("bearer" = [])),
    request_body = BurnRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed"),
        (status = 504, description = "Confirmation timed out")
    )
)]
pub async fn burn(Auth(caller): Auth, State(state): State<AppState>, Json(req): Json<BurnRequest>) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, from = %req.from, "interest token burn");
    state
        .services
        .interest_token
        .burn(&req.contract, &req.from, req.amount.into())
        .await
}

#[utoipa::path(
    post,
    path = "/interest-token/set-liquidity",
    tag = "InterestToken",
    security(("bearer" = [])),
    request_body = SetLiquidityRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_liquidity(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetLiquidityRequest>,
) -> WriteOutcome {
    state
        .services
        .interest_token
        .set_liquidity_index(&req.contract, req.new_index.into())
        .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::api::{
        router,
        testing::{bearer, send},
    };
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter};
    use crate::state::{test_state, test_state_with};
    use axum::http::StatusCode;
    use serde_json::json;

    const TOKEN: &str = "0x7777777777777777777777777777777777777777";
    const HOLDER: &str = "0x6666666666666666666666666666666666666666";

    #[tokio::test]
    async fn mint_is_confirmed() {
        let (state, _dir) = test_state();
        let auth = bearer(&state);
        let body = json!({ "contract": TOKEN, "to": HOLDER, "amount": 42 });

        let (status, outcome) =
            send(router(state), "POST", "/interest-token/mint", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["receipt"]["status"], true);
    }

    #[tokio::test]
    async fn stalled_confirmation_maps_to_gateway_timeout() {
        let gateway = gateway(MockSubmitter::new(Behaviour::Hang), Some(credential()))
            .with_confirmation_timeout(Duration::from_millis(20));
        let (state, _dir) = test_state_with(gateway);
        let auth = bearer(&state);
        let body = json!({ "contract": TOKEN, "from": HOLDER, "amount": 1 });

        let (status, error) =
            send(router(state), "POST", "/interest-token/burn", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(error["error_code"], "confirmation_timeout");
    }

    #[tokio::test]
    async fn scaled_balance_is_public() {
        let (state, _dir) = test_state();
        let uri = format!("/interest-token/scaled-balance?contract={TOKEN}&user={HOLDER}");
        let (status, _) = send(router(state), "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
