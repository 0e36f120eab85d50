// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Open lending positions, one per collateral asset and address.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::database::{
    make_key, prefix_range, DbError, DbResult, RelayDatabase, IDENTITIES, POSITIONS,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PositionRecord {
    pub id: String,
    /// Lowercase address the position belongs to
    pub address: String,
    /// Collateral asset symbol or address
    pub collateral: String,
    /// Collateral amount
    pub amount: String,
    /// Outstanding debt, e.g. `8000 USDC`
    pub borrowed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_factor: Option<f64>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when opening or updating a position.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PositionUpdate {
    pub collateral: String,
    pub amount: String,
    #[serde(default)]
    pub borrowed: Option<String>,
    #[serde(default)]
    pub health_factor: Option<f64>,
    /// Defaults to `Healthy`
    #[serde(default)]
    pub status: Option<String>,
}

pub struct PositionRepository<'a> {
    db: &'a RelayDatabase,
}

impl<'a> PositionRepository<'a> {
    pub fn new(db: &'a RelayDatabase) -> Self {
        Self { db }
    }

    /// Open or replace the caller's position for `update.collateral`.
    ///
    /// The position id is kept across updates.
    pub fn upsert(&self, address: &str, update: PositionUpdate) -> DbResult<PositionRecord> {
        let address = address.to_lowercase();
        let key = make_key(&address, &update.collateral);

        let write_txn = self.db.inner().begin_write()?;
        let record = {
            let identities = write_txn.open_table(IDENTITIES)?;
            if identities.get(address.as_str())?.is_none() {
                return Err(DbError::NotFound(format!("identity {address}")));
            }

            let mut positions = write_txn.open_table(POSITIONS)?;
            let id = match positions.get(key.as_slice())? {
                Some(existing) => serde_json::from_slice::<PositionRecord>(existing.value())?.id,
                None => Uuid::new_v4().to_string(),
            };

            let record = PositionRecord {
                id,
                address,
                collateral: update.collateral,
                amount: update.amount,
                borrowed: update.borrowed.unwrap_or_else(|| "0".to_string()),
                health_factor: update.health_factor,
                status: update.status.unwrap_or_else(|| "Healthy".to_string()),
                updated_at: Utc::now(),
            };
            let json = serde_json::to_vec(&record)?;
            positions.insert(key.as_slice(), json.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// All positions for an address, ordered by collateral. Empty for
    /// unknown addresses.
    pub fn list(&self, address: &str) -> DbResult<Vec<PositionRecord>> {
        let read_txn = self.db.inner().begin_read()?;
        let positions = read_txn.open_table(POSITIONS)?;

        let (start, end) = prefix_range(address);
        let mut results = Vec::new();
        for entry in positions.range(start.as_slice()..end.as_slice())? {
            let (_, value) = entry?;
            results.push(serde_json::from_slice(value.value())?);
        }
        Ok(results)
    }
}
