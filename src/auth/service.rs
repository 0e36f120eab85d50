// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login flow: nonce issuance, verification, single-use consumption and
//! session issuance.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::AuthError;
use super::session::{AccessToken, SessionIssuer};
use super::verifier::{self, LoginRequest};
use crate::config::LoginDomain;
use crate::storage::{normalize_address, IdentityRepository, RelayDatabase};

/// Response body of `POST /auth/nonce`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NonceChallenge {
    pub nonce: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService {
    db: Arc<RelayDatabase>,
    sessions: Arc<SessionIssuer>,
    nonce_ttl: Duration,
    domain: LoginDomain,
    rng: SystemRandom,
}

impl AuthService {
    pub fn new(
        db: Arc<RelayDatabase>,
        sessions: Arc<SessionIssuer>,
        nonce_ttl: Duration,
        domain: LoginDomain,
    ) -> Self {
        Self {
            db,
            sessions,
            nonce_ttl,
            domain,
            rng: SystemRandom::new(),
        }
    }

    /// Issue a fresh nonce for `address`, creating its identity if needed.
    ///
    /// `address` must already be normalised.
    pub fn issue_nonce(&self, address: &str) -> Result<NonceChallenge, AuthError> {
        let nonce = self.generate_nonce()?;
        let ttl = chrono::Duration::from_std(self.nonce_ttl)
            .map_err(|e| AuthError::Internal(format!("nonce ttl out of range: {e}")))?;
        let expires_at = Utc::now() + ttl;

        IdentityRepository::new(&self.db)
            .issue_nonce(address, &nonce, expires_at)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::debug!(%address, %expires_at, "login nonce issued");
        Ok(NonceChallenge { nonce, expires_at })
    }

    /// Verify a signed login and, if the nonce is still live, consume it and
    /// return a session token.
    pub fn login(&self, request: &LoginRequest) -> Result<AccessToken, AuthError> {
        self.login_at(request, Utc::now())
    }

    pub fn login_at(&self, request: &LoginRequest, now: DateTime<Utc>) -> Result<AccessToken, AuthError> {
        let Some(address) = normalize_address(&request.address) else {
            tracing::warn!(address = %request.address, "wallet login denied: malformed address");
            return Err(AuthError::AuthenticationDenied);
        };

        let identities = IdentityRepository::new(&self.db);
        let stored = identities
            .find_by_address(&address)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let verified = verifier::verify(request, stored.as_ref(), &self.domain, now).map_err(|reason| {
            tracing::warn!(%address, %reason, "wallet login denied");
            AuthError::AuthenticationDenied
        })?;

        let consumed = identities
            .consume_nonce(&verified.address, &verified.nonce, now)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !consumed {
            tracing::warn!(%address, "wallet login denied: nonce already used");
            return Err(AuthError::AuthenticationDenied);
        }

        tracing::info!(%address, "wallet login succeeded");
        self.sessions.issue(&verified, now)
    }

    fn generate_nonce(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; 8];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AuthError::Internal("random source unavailable".to_string()))?;
        Ok(u64::from_be_bytes(bytes).to_string())
    }
}
