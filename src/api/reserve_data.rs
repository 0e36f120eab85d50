// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reserve data endpoints.
//!
//! Config and state bodies are passed through as objects keyed by the
//! contract's parameter names; the asset is taken from the request.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    services::{ReadOutcome, WriteOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReserveQuery {
    /// Reserve data contract address
    pub contract: String,
    pub asset: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetReserveConfigRequest {
    pub contract: String,
    pub asset: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetReserveStateRequest {
    pub contract: String,
    pub asset: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub state: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetUserReserveDataRequest {
    pub contract: String,
    pub user: String,
    pub asset: String,
    /// `scaled_a_token_balance`, `scaled_variable_debt` and `is_using_as_collateral`
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

#[utoipa::path(
    get,
    path = "/reserve-data/config",
    tag = "ReserveData",
    params(ReserveQuery),
    responses(
        (status = 200, description = "Reserve configuration, null, or an informational stub", body = Object)
    )
)]
pub async fn config(State(state): State<AppState>, Query(query): Query<ReserveQuery>) -> ReadOutcome {
    state
        .services
        .reserve_data
        .reserve_config(&query.contract, &query.asset)
        .await
}

#[utoipa::path(
    post,
    path = "/reserve-data/set-config",
    tag = "ReserveData",
    security(("bearer" = [])),
    request_body = SetReserveConfigRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Missing or mistyped fields")
    )
)]
pub async fn set_config(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetReserveConfigRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "set reserve config");
    state
        .services
        .reserve_data
        .set_reserve_config(&req.contract, &req.asset, req.config)
        .await
}

#[utoipa::path(
    post,
    path = "/reserve-data/set-state",
    tag = "ReserveData",
    security(("bearer" = [])),
    request_body = SetReserveStateRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Missing or mistyped fields")
    )
)]
pub async fn set_state(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetReserveStateRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "set reserve state");
    state
        .services
        .reserve_data
        .set_reserve_state(&req.contract, &req.asset, req.state)
        .await
}

#[utoipa::path(
    post,
    path = "/reserve-data/set-user-data",
    tag = "ReserveData",
    security(("bearer" = [])),
    request_body = SetUserReserveDataRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Missing or mistyped fields")
    )
)]
pub async fn set_user_data(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetUserReserveDataRequest>,
) -> WriteOutcome {
    state
        .services
        .reserve_data
        .set_user_reserve_data(&req.contract, &req.user, &req.asset, req.data)
        .await
}
