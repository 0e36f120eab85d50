// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Activity history endpoints.
//!
//! Clients report the transactions they performed; records are scoped to the
//! caller's address and returned newest first.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{ActivityRecord, ActivityRepository, NewActivity},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityListResponse {
    pub transactions: Vec<ActivityRecord>,
    pub total: usize,
}

/// List the caller's activity, newest first.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activity history", body = ActivityListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let transactions = ActivityRepository::new(&state.db).list(&user.address)?;
    let total = transactions.len();
    Ok(Json(ActivityListResponse {
        transactions,
        total,
    }))
}

/// Record an activity entry for the caller.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    security(("bearer" = [])),
    request_body = NewActivity,
    responses(
        (status = 201, description = "Recorded", body = ActivityRecord),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No identity for this address")
    )
)]
pub async fn create_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<NewActivity>,
) -> Result<(StatusCode, Json<ActivityRecord>), ApiError> {
    if request.kind.trim().is_empty() {
        return Err(ApiError::bad_request("kind must not be empty"));
    }

    let record = ActivityRepository::new(&state.db).create(&user.address, request)?;
    tracing::debug!(address = %user.address, id = %record.id, kind = %record.kind, "activity recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use crate::api::{
        router,
        testing::{bearer, send, CALLER},
    };
    use crate::state::test_state;
    use crate::storage::{IdentityPatch, IdentityRepository};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn records_are_listed_newest_first() {
        let (state, _dir) = test_state();
        IdentityRepository::new(&state.db)
            .upsert(CALLER, IdentityPatch::default())
            .unwrap();
        let auth = bearer(&state);
        let app = router(state);

        for kind in ["deposit", "borrow"] {
            let (status, record) = send(
                app.clone(),
                "POST",
                "/transactions",
                Some(&auth),
                Some(json!({ "kind": kind, "amount": "10" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(record["status"], "pending");
            // Distinct millisecond timestamps
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (status, body) = send(app, "GET", "/transactions", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["transactions"][0]["kind"], "borrow");
        assert_eq!(body["transactions"][1]["kind"], "deposit");
    }

    #[tokio::test]
    async fn recording_for_unknown_identity_is_not_found() {
        let (state, _dir) = test_state();
        let auth = bearer(&state);
        let (status, body) = send(
            router(state),
            "POST",
            "/transactions",
            Some(&auth),
            Some(json!({ "kind": "deposit" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], "not_found");
    }

    #[tokio::test]
    async fn empty_kind_is_rejected() {
        let (state, _dir) = test_state();
        let auth = bearer(&state);
        let (status, _) = send(
            router(state),
            "POST",
            "/transactions",
            Some(&auth),
            Some(json!({ "kind": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
