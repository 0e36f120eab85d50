// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity records and their single-use login nonces.
//!
//! An identity is created the first time a nonce is requested for an address
//! and is never deleted. At most one live nonce exists per address; it is
//! cleared by [`IdentityRepository::consume_nonce`] exactly once.

use std::str::FromStr;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::database::{DbResult, RelayDatabase, IDENTITIES};

/// Identity stored per wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Identity {
    /// Lowercase `0x` address (primary key)
    pub address: String,
    /// Outstanding login nonce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// When the outstanding nonce stops being accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Cached figures, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    fn new(address: String, now: DateTime<Utc>) -> Self {
        Self {
            address,
            nonce: None,
            nonce_expires_at: None,
            username: None,
            avatar_url: None,
            balance: None,
            collateral_value: None,
            borrowed_value: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a nonce is outstanding and unexpired at `now`.
    pub fn has_live_nonce(&self, now: DateTime<Utc>) -> bool {
        self.nonce.is_some() && self.nonce_expires_at.is_none_or(|exp| now <= exp)
    }
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct IdentityPatch {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

/// Canonical key for an address: lowercase `0x` hex.
///
/// Returns `None` if the input is not a 20-byte hex address.
pub fn normalize_address(raw: &str) -> Option<String> {
    let address = Address::from_str(raw.trim()).ok()?;
    Some(format!("0x{}", alloy::hex::encode(address.as_slice())))
}

/// Repository for identity operations.
pub struct IdentityRepository<'a> {
    db: &'a RelayDatabase,
}

impl<'a> IdentityRepository<'a> {
    pub fn new(db: &'a RelayDatabase) -> Self {
        Self { db }
    }

    /// Look up an identity by address.
    pub fn find_by_address(&self, address: &str) -> DbResult<Option<Identity>> {
        let key = address.to_lowercase();
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(IDENTITIES)?;
        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Create the identity if needed, then apply the profile patch.
    pub fn upsert(&self, address: &str, patch: IdentityPatch) -> DbResult<Identity> {
        self.modify(address, Utc::now(), |identity| {
            if let Some(username) = patch.username {
                identity.username = Some(username);
            }
            if let Some(avatar_url) = patch.avatar_url {
                identity.avatar_url = Some(avatar_url);
            }
        })
    }

    /// Store a fresh nonce for the address, replacing any outstanding one.
    pub fn issue_nonce(
        &self,
        address: &str,
        nonce: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<Identity> {
        self.modify(address, Utc::now(), |identity| {
            identity.nonce = Some(nonce.to_string());
            identity.nonce_expires_at = Some(expires_at);
        })
    }

    /// Clear the nonce iff it still equals `expected` and has not expired.
    ///
    /// Runs as one write transaction; of any number of concurrent callers
    /// presenting the same nonce, at most one observes `true`.
    pub fn consume_nonce(
        &self,
        address: &str,
        expected: &str,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let key = address.to_lowercase();
        let write_txn = self.db.inner().begin_write()?;
        let consumed = {
            let mut table = write_txn.open_table(IDENTITIES)?;
            let current: Option<Identity> = match table.get(key.as_str())? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            match current {
                Some(mut identity)
                    if identity.nonce.as_deref() == Some(expected)
                        && identity.has_live_nonce(now) =>
                {
                    identity.nonce = None;
                    identity.nonce_expires_at = None;
                    identity.updated_at = now;
                    let json = serde_json::to_vec(&identity)?;
                    table.insert(key.as_str(), json.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(consumed)
    }

    /// Drop every nonce whose expiry is in the past. Returns how many were cleared.
    pub fn clear_expired_nonces(&self, now: DateTime<Utc>) -> DbResult<usize> {
        let write_txn = self.db.inner().begin_write()?;
        let cleared = {
            let mut table = write_txn.open_table(IDENTITIES)?;
            let mut expired = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let identity: Identity = serde_json::from_slice(value.value())?;
                if identity.nonce.is_some() && identity.nonce_expires_at.is_some_and(|exp| now > exp)
                {
                    expired.push((key.value().to_string(), identity));
                }
            }

            for (key, mut identity) in expired.iter().cloned() {
                identity.nonce = None;
                identity.nonce_expires_at = None;
                identity.updated_at = now;
                let json = serde_json::to_vec(&identity)?;
                table.insert(key.as_str(), json.as_slice())?;
            }
            expired.len()
        };
        write_txn.commit()?;
        Ok(cleared)
    }

    fn modify<F>(&self, address: &str, now: DateTime<Utc>, apply: F) -> DbResult<Identity>
    where
        F: FnOnce(&mut Identity),
    {
        let key = address.to_lowercase();
        let write_txn = self.db.inner().begin_write()?;
        let identity = {
            let mut table = write_txn.open_table(IDENTITIES)?;
            let existing: Option<Identity> = match table.get(key.as_str())? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            let mut identity = existing.unwrap_or_else(|| Identity::new(key.clone(), now));
            apply(&mut identity);
            identity.updated_at = now;
            let json = serde_json::to_vec(&identity)?;
            table.insert(key.as_str(), json.as_slice())?;
            identity
        };
        write_txn.commit()?;
        Ok(identity)
    }
}
