// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet login endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::users::{load_profile, ProfileResponse};
use crate::{
    auth::{AccessToken, Auth, AuthError, LoginRequest, NonceChallenge},
    error::ApiError,
    state::AppState,
    storage::normalize_address,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NonceQuery {
    /// Wallet address requesting a login challenge
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Issue a single-use login nonce for an address.
#[utoipa::path(
    post,
    path = "/auth/nonce",
    tag = "Auth",
    params(NonceQuery),
    responses(
        (status = 200, description = "Nonce issued", body = NonceChallenge),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn request_nonce(
    State(state): State<AppState>,
    Query(query): Query<NonceQuery>,
) -> Result<Json<NonceChallenge>, ApiError> {
    let address = normalize_address(&query.address)
        .ok_or_else(|| ApiError::bad_request("address must be a 20-byte hex address"))?;

    let challenge = state
        .auth
        .issue_nonce(&address)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(challenge))
}

/// Verify a signed login challenge and return a session token.
///
/// Every failure returns the same 401 body.
#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AccessToken),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AccessToken>, AuthError> {
    state.auth.login(&request).map(Json)
}

/// End the session. Tokens are stateless, so this only acknowledges.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn logout(Auth(user): Auth) -> Json<LogoutResponse> {
    tracing::info!(address = %user.address, "logout");
    Json(LogoutResponse { success: true })
}

#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Identity of the session", body = ProfileResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(load_profile(&state, &user.address)?))
}

#[cfg(test)]
mod tests {
    use crate::api::{router, testing::send};
    use crate::auth::verifier::test_support::{signed_login, signing_key};
    use crate::state::test_state;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn login_body(request: &crate::auth::LoginRequest) -> Value {
        json!({
            "address": request.address,
            "signature": request.signature,
            "typedData": serde_json::to_value(&request.typed_data).unwrap(),
            "publicKey": request.public_key,
        })
    }

    #[tokio::test]
    async fn nonce_rejects_malformed_addresses() {
        let (state, _dir) = test_state();
        let (status, body) = send(router(state), "POST", "/auth/nonce?address=0x12", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "bad_request");
    }

    #[tokio::test]
    async fn login_flow_issues_token_once() {
        let (state, _dir) = test_state();
        let app = router(state);
        let key = signing_key(11);
        let address = crate::auth::verifier::test_support::address_of(&key);

        let (status, challenge) = send(
            app.clone(),
            "POST",
            &format!("/auth/nonce?address={address}"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let nonce = challenge["nonce"].as_str().unwrap();
        assert!(challenge["expires_at"].is_string());

        let body = login_body(&signed_login(&key, nonce));
        let (status, token) = send(app.clone(), "POST", "/auth/verify", None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let bearer = format!("Bearer {}", token["access_token"].as_str().unwrap());

        let (status, profile) = send(app.clone(), "GET", "/auth/profile", Some(&bearer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["address"], address);

        let (status, denied) = send(app.clone(), "POST", "/auth/verify", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            denied,
            json!({"error": "Authentication failed", "error_code": "authentication_denied"})
        );

        let (status, logout) = send(app, "POST", "/auth/logout", Some(&bearer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logout, json!({"success": true}));
    }

    #[tokio::test]
    async fn unknown_address_gets_the_same_denial() {
        let (state, _dir) = test_state();
        let body = login_body(&signed_login(&signing_key(12), "123"));

        let (status, denied) = send(router(state), "POST", "/auth/verify", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(denied["error_code"], "authentication_denied");
    }
}
