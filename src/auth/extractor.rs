// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user.address is the caller's wallet
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Validates the bearer token from the `Authorization` header against the
/// session issuer.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.sessions.validate(token.trim())?;
        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::VerifiedIdentity;
    use crate::state::test_state;
    use axum::http::Request;
    use chrono::Utc;

    fn parts(header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, _dir) = test_state();
        let result = Auth::from_request_parts(&mut parts(None), &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));

        let result =
            Auth::from_request_parts(&mut parts(Some("Basic abc".into())), &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_session_token() {
        let (state, _dir) = test_state();
        let verified = VerifiedIdentity {
            address: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".into(),
            nonce: "1".into(),
        };
        let token = state.sessions.issue(&verified, Utc::now()).unwrap();

        let mut parts = parts(Some(format!("Bearer {}", token.access_token)));
        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.address, verified.address);
    }

    #[tokio::test]
    async fn request_extensions_do_not_replace_the_token() {
        let (state, _dir) = test_state();
        let mut parts = parts(None);
        parts.extensions.insert(AuthenticatedUser {
            address: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".to_string(),
            expires_at: i64::MAX,
        });

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }
}
