// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lending positions of the signed-in wallet.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{PositionRecord, PositionRepository, PositionUpdate},
};

/// List the caller's positions. Wallets with no history get an empty list.
#[utoipa::path(
    get,
    path = "/positions",
    tag = "Positions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Open positions", body = Vec<PositionRecord>),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn list_positions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionRecord>>, ApiError> {
    let positions = PositionRepository::new(&state.db).list(&user.address)?;
    Ok(Json(positions))
}

/// Open or update the caller's position for one collateral asset.
#[utoipa::path(
    post,
    path = "/positions",
    tag = "Positions",
    security(("bearer" = [])),
    request_body = PositionUpdate,
    responses(
        (status = 201, description = "Stored", body = PositionRecord),
        (status = 400, description = "Empty collateral or amount"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No identity for this address")
    )
)]
pub async fn upsert_position(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<PositionUpdate>,
) -> Result<(StatusCode, Json<PositionRecord>), ApiError> {
    if request.collateral.trim().is_empty() || request.amount.trim().is_empty() {
        return Err(ApiError::bad_request("collateral and amount are required"));
    }

    let record = PositionRepository::new(&state.db).upsert(&user.address, request)?;
    tracing::debug!(address = %user.address, collateral = %record.collateral, "position stored");
    Ok((StatusCode::CREATED, Json(record)))
}
