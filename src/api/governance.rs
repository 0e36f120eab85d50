// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Governance token endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{ContractQuery, Quantity};
use crate::{
    auth::Auth,
    services::{ReadOutcome, WriteOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = governance::MintRequest)]
pub struct MintRequest {
    pub contract: String,
    pub to: String,
    pub amount: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = governance::BurnRequest)]
pub struct BurnRequest {
    pub contract: String,
    pub from: String,
    pub amount: Quantity,
}

#[utoipa::path(
    get,
    path = "/governance/total-supply",
    tag = "Governance",
    params(ContractQuery),
    responses(
        (status = 200, description = "Total supply, null, or an informational stub", body = Object)
    )
)]
pub async fn total_supply(State(state): State<AppState>, Query(query): Query<ContractQuery>) -> ReadOutcome {
    state.services.governance.total_supply(&query.contract).await
}

#[utoipa::path(
    post,
    path = "/governance/mint",
    tag = "Governance",
    security(("bearer" = [])),
    request_body = MintRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn mint(Auth(caller): Auth, State(state): State<AppState>, Json(req): Json<MintRequest>) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, to = %req.to, "governance mint");
    state
        .services
        .governance
        .mint(&req.contract, &req.to, req.amount.into())
        .await
}

#[utoipa::path(
    post,
    path = "/governance/burn",
    tag = "Governance",
    security(("bearer" = [])),
    request_body = BurnRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn burn(Auth(caller): Auth, State(state): State<AppState>, Json(req): Json<BurnRequest>) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, from = %req.from, "governance burn");
    state
        .services
        .governance
        .burn(&req.contract, &req.from, req.amount.into())
        .await
}

#[cfg(test)]
mod tests {
    use crate::api::{
        router,
        testing::{bearer, send},
    };
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter};
    use crate::state::{test_state, test_state_with};
    use axum::http::StatusCode;
    use serde_json::json;

    const TOKEN: &str = "0x5555555555555555555555555555555555555555";
    const HOLDER: &str = "0x6666666666666666666666666666666666666666";

    #[tokio::test]
    async fn mint_requires_a_session() {
        let (state, _dir) = test_state();
        let body = json!({ "contract": TOKEN, "to": HOLDER, "amount": 1 });
        let (status, _) = send(router(state), "POST", "/governance/mint", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reverted_burn_reports_confirmation_failure() {
        let (state, _dir) =
            test_state_with(gateway(MockSubmitter::new(Behaviour::Revert), Some(credential())));
        let auth = bearer(&state);
        let body = json!({ "contract": TOKEN, "from": HOLDER, "amount": "7" });

        let (status, error) = send(router(state), "POST", "/governance/burn", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error["error_code"], "confirmation_failed");
    }

    #[tokio::test]
    async fn total_supply_is_informational_offline() {
        let (state, _dir) = test_state();
        let uri = format!("/governance/total-supply?contract={TOKEN}");
        let (status, body) = send(router(state), "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["info"].is_string());
    }
}
