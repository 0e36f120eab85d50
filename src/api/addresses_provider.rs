// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Addresses provider endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::ContractQuery;
use crate::{
    auth::Auth,
    services::{ReadOutcome, WriteOutcome},
    state::AppState,
};

/// Body shared by the three registry setters.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAddressRequest {
    pub contract: String,
    pub new_address: String,
}

#[utoipa::path(
    get,
    path = "/addresses-provider/all",
    tag = "AddressesProvider",
    params(ContractQuery),
    responses(
        (status = 200, description = "Registered protocol addresses, null, or an informational stub", body = Object)
    )
)]
pub async fn all(State(state): State<AppState>, Query(query): Query<ContractQuery>) -> ReadOutcome {
    state.services.addresses_provider.all_addresses(&query.contract).await
}

#[utoipa::path(
    post,
    path = "/addresses-provider/set-lending-pool",
    tag = "AddressesProvider",
    security(("bearer" = [])),
    request_body = SetAddressRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_lending_pool(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetAddressRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, new_address = %req.new_address, "register lending pool");
    state
        .services
        .addresses_provider
        .set_lending_pool(&req.contract, &req.new_address)
        .await
}

#[utoipa::path(
    post,
    path = "/addresses-provider/set-shielded-pool",
    tag = "AddressesProvider",
    security(("bearer" = [])),
    request_body = SetAddressRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_shielded_pool(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetAddressRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, new_address = %req.new_address, "register shielded pool");
    state
        .services
        .addresses_provider
        .set_shielded_pool(&req.contract, &req.new_address)
        .await
}

#[utoipa::path(
    post,
    path = "/addresses-provider/set-price-oracle",
    tag = "AddressesProvider",
    security(("bearer" = [])),
    request_body = SetAddressRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_price_oracle(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetAddressRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, new_address = %req.new_address, "register price oracle");
    state
        .services
        .addresses_provider
        .set_price_oracle(&req.contract, &req.new_address)
        .await
}
