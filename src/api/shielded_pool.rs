// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shielded pool endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::Quantity;
use crate::{
    auth::Auth,
    services::{ReadOutcome, ShieldedWithdrawal, WriteOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MerkleRootQuery {
    /// Shielded pool contract address
    pub contract_address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositShieldedRequest {
    pub contract: String,
    /// 32-byte note commitment, `0x` hex
    pub commitment: String,
    pub asset: String,
    pub amount: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawShieldedRequest {
    pub contract: String,
    /// 32-byte nullifier, `0x` hex
    pub nullifier: String,
    pub recipient: String,
    pub asset: String,
    pub amount: Quantity,
    #[schema(value_type = Vec<String>)]
    pub merkle_proof: Vec<Value>,
    #[schema(value_type = Vec<u8>)]
    pub path_indices: Vec<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssetRequest {
    pub contract: String,
    pub asset: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositLimitsRequest {
    pub contract: String,
    pub min_amount: Quantity,
    pub max_amount: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositFeeRequest {
    pub contract: String,
    pub fee_basis_points: Quantity,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeCollectorRequest {
    pub contract: String,
    pub new_collector: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmergencyWithdrawRequest {
    pub contract: String,
    pub asset: String,
    pub recipient: String,
    pub amount: Quantity,
}

/// Whether a commitment exists in the tree, and its leaf index.
#[utoipa::path(
    get,
    path = "/shielded-pool/commitment/{contract}/{commitment}",
    tag = "ShieldedPool",
    params(
        ("contract" = String, Path, description = "Shielded pool contract address"),
        ("commitment" = String, Path, description = "Note commitment")
    ),
    responses(
        (status = 200, description = "Commitment info, null, or an informational stub", body = Object)
    )
)]
pub async fn commitment(
    State(state): State<AppState>,
    Path((contract, commitment)): Path<(String, String)>,
) -> ReadOutcome {
    state.services.shielded_pool.commitment(&contract, &commitment).await
}

#[utoipa::path(
    get,
    path = "/shielded-pool/nullifier/{contract}/{nullifier}",
    tag = "ShieldedPool",
    params(
        ("contract" = String, Path, description = "Shielded pool contract address"),
        ("nullifier" = String, Path, description = "Nullifier hash")
    ),
    responses(
        (status = 200, description = "Whether the nullifier is spent, null, or an informational stub", body = Object)
    )
)]
pub async fn nullifier(
    State(state): State<AppState>,
    Path((contract, nullifier)): Path<(String, String)>,
) -> ReadOutcome {
    state.services.shielded_pool.is_nullifier_used(&contract, &nullifier).await
}

#[utoipa::path(
    get,
    path = "/shielded-pool/merkle-root",
    tag = "ShieldedPool",
    params(MerkleRootQuery),
    responses(
        (status = 200, description = "Current root, null, or an informational stub", body = Object)
    )
)]
pub async fn merkle_root(State(state): State<AppState>, Query(query): Query<MerkleRootQuery>) -> ReadOutcome {
    state.services.shielded_pool.merkle_root(&query.contract_address).await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/deposit",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = DepositShieldedRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Arguments do not match the contract interface"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn deposit(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<DepositShieldedRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, "shielded deposit");
    state
        .services
        .shielded_pool
        .deposit(&req.contract, &req.commitment, &req.asset, req.amount.into())
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/withdraw",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = WithdrawShieldedRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Arguments do not match the contract interface"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn withdraw(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<WithdrawShieldedRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, "shielded withdraw");
    let withdrawal = ShieldedWithdrawal {
        nullifier: req.nullifier,
        recipient: req.recipient,
        asset: req.asset,
        amount: req.amount.into(),
        merkle_proof: req.merkle_proof,
        path_indices: req.path_indices,
    };
    state.services.shielded_pool.withdraw(&req.contract, withdrawal).await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/add-supported-asset",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = AssetRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_supported_asset(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<AssetRequest>,
) -> WriteOutcome {
    state
        .services
        .shielded_pool
        .add_supported_asset(&req.contract, &req.asset)
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/remove-supported-asset",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = AssetRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn remove_supported_asset(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<AssetRequest>,
) -> WriteOutcome {
    state
        .services
        .shielded_pool
        .remove_supported_asset(&req.contract, &req.asset)
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/set-deposit-limits",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = DepositLimitsRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_deposit_limits(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<DepositLimitsRequest>,
) -> WriteOutcome {
    state
        .services
        .shielded_pool
        .set_deposit_limits(&req.contract, req.min_amount.into(), req.max_amount.into())
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/set-deposit-fee",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = DepositFeeRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_deposit_fee(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<DepositFeeRequest>,
) -> WriteOutcome {
    state
        .services
        .shielded_pool
        .set_deposit_fee(&req.contract, req.fee_basis_points.into())
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/set-fee-collector",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = FeeCollectorRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_fee_collector(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<FeeCollectorRequest>,
) -> WriteOutcome {
    state
        .services
        .shielded_pool
        .set_fee_collector(&req.contract, &req.new_collector)
        .await
}

#[utoipa::path(
    post,
    path = "/shielded-pool/emergency-withdraw",
    tag = "ShieldedPool",
    security(("bearer" = [])),
    request_body = EmergencyWithdrawRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn emergency_withdraw(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<EmergencyWithdrawRequest>,
) -> WriteOutcome {
    tracing::warn!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "emergency withdraw requested");
    state
        .services
        .shielded_pool
        .emergency_withdraw(&req.contract, &req.asset, &req.recipient, req.amount.into())
        .await
}
