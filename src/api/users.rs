// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{Identity, IdentityPatch, IdentityRepository},
};

/// Public view of an identity. Login nonces are never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    /// Lowercase wallet address
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Identity> for ProfileResponse {
    fn from(identity: Identity) -> Self {
        Self {
            address: identity.address,
            username: identity.username,
            avatar_url: identity.avatar_url,
            balance: identity.balance,
            collateral_value: identity.collateral_value,
            borrowed_value: identity.borrowed_value,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

/// Load the caller's profile.
pub(crate) fn load_profile(state: &AppState, address: &str) -> Result<ProfileResponse, ApiError> {
    IdentityRepository::new(&state.db)
        .find_by_address(address)?
        .map(ProfileResponse::from)
        .ok_or_else(|| ApiError::not_found(format!("identity {address} not found")))
}

/// Get the signed-in wallet's profile.
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No identity for this address")
    )
)]
pub async fn get_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(load_profile(&state, &user.address)?))
}

/// Update username and/or avatar. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "Users",
    security(("bearer" = [])),
    request_body = IdentityPatch,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(patch): Json<IdentityPatch>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let identity = IdentityRepository::new(&state.db).upsert(&user.address, patch)?;
    tracing::info!(address = %user.address, "profile updated");
    Ok(Json(identity.into()))
}
