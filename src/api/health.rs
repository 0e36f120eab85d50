// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::chain::ContractKind;
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Relay database availability.
    pub database: String,
    /// Contract interface descriptors ("ok" or "missing: <kinds>").
    pub descriptors: String,
    /// Read RPC endpoint ("configured" or "not_configured").
    /// Reads degrade without it, so it never fails the check.
    pub rpc: String,
    /// Administrative signing credential ("configured" or "not_configured").
    pub signer: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn check_database(state: &AppState) -> String {
    match state.db.health_check() {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            "unavailable".to_string()
        }
    }
}

fn check_descriptors(state: &AppState) -> String {
    let missing: Vec<&str> = ContractKind::ALL
        .into_iter()
        .filter(|kind| state.gateway.resolve_interface(*kind).is_err())
        .map(|kind| kind.as_str())
        .collect();

    if missing.is_empty() {
        "ok".to_string()
    } else {
        format!("missing: {}", missing.join(", "))
    }
}

fn configured(present: bool) -> String {
    if present { "configured" } else { "not_configured" }.to_string()
}

/// Health check endpoint handler.
///
/// Returns 200 if the database and every contract interface are available,
/// 503 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database = check_database(&state);
    let descriptors = check_descriptors(&state);
    let all_ok = database == "ok" && descriptors == "ok";

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            database,
            descriptors,
            rpc: configured(state.config.rpc_url.is_some()),
            signer: configured(state.gateway.has_admin_credential()),
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only if all dependencies are available.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}
