// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-address activity history submitted by clients.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::database::{
    make_index_key, prefix_range, DbError, DbResult, RelayDatabase, ACTIVITY, ACTIVITY_INDEX,
    IDENTITIES,
};

/// A recorded user action (deposit, borrow, shielded transfer, ...).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    /// Lowercase address the record belongs to
    pub address: String,
    /// Free-form action label, e.g. `deposit`
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a record.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewActivity {
    pub kind: String,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    /// Defaults to `pending`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

pub struct ActivityRepository<'a> {
    db: &'a RelayDatabase,
}

impl<'a> ActivityRepository<'a> {
    pub fn new(db: &'a RelayDatabase) -> Self {
        Self { db }
    }

    /// Store a record for an existing identity.
    pub fn create(&self, address: &str, new: NewActivity) -> DbResult<ActivityRecord> {
        self.create_at(address, new, Utc::now())
    }

    pub(crate) fn create_at(
        &self,
        address: &str,
        new: NewActivity,
        now: DateTime<Utc>,
    ) -> DbResult<ActivityRecord> {
        let address = address.to_lowercase();
        let record = ActivityRecord {
            id: Uuid::new_v4().to_string(),
            address: address.clone(),
            kind: new.kind,
            asset: new.asset,
            amount: new.amount,
            tx_hash: new.tx_hash,
            status: new.status.unwrap_or_else(|| "pending".to_string()),
            metadata: new.metadata,
            created_at: now,
        };
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.inner().begin_write()?;
        {
            let identities = write_txn.open_table(IDENTITIES)?;
            if identities.get(address.as_str())?.is_none() {
                return Err(DbError::NotFound(format!("identity {address}")));
            }

            let mut records = write_txn.open_table(ACTIVITY)?;
            records.insert(record.id.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(ACTIVITY_INDEX)?;
            let key = make_index_key(&address, now.timestamp_millis(), &record.id);
            index.insert(key.as_slice(), record.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(record)
    }

    /// All records for an address, newest first.
    pub fn list(&self, address: &str) -> DbResult<Vec<ActivityRecord>> {
        let read_txn = self.db.inner().begin_read()?;
        let index = read_txn.open_table(ACTIVITY_INDEX)?;
        let records = read_txn.open_table(ACTIVITY)?;

        let (start, end) = prefix_range(address);
        let mut results = Vec::new();
        for entry in index.range(start.as_slice()..end.as_slice())? {
            let (_, id) = entry?;
            if let Some(value) = records.get(id.value())? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::temp_db;
    use crate::storage::IdentityRepository;
    use chrono::Duration;

    const ADDR: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    fn new_activity(kind: &str) -> NewActivity {
        NewActivity {
            kind: kind.to_string(),
            asset: Some("0x0000000000000000000000000000000000000001".into()),
            amount: Some("100".into()),
            tx_hash: None,
            status: None,
            metadata: None,
        }
    }

    #[test]
    fn create_requires_identity() {
        let (db, _dir) = temp_db();
        let repo = ActivityRepository::new(&db);
        let result = repo.create(ADDR, new_activity("deposit"));
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn list_returns_newest_first() {
        let (db, _dir) = temp_db();
        IdentityRepository::new(&db)
            .upsert(ADDR, Default::default())
            .unwrap();
        let repo = ActivityRepository::new(&db);
        let now = Utc::now();

        repo.create_at(ADDR, new_activity("deposit"), now - Duration::minutes(2))
            .unwrap();
        repo.create_at(ADDR, new_activity("borrow"), now).unwrap();
        repo.create_at(ADDR, new_activity("repay"), now - Duration::minutes(1))
            .unwrap();

        let kinds: Vec<_> = repo
            .list(&ADDR.to_uppercase().replace("0X", "0x"))
            .unwrap()
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec!["borrow", "repay", "deposit"]);
    }

    #[test]
    fn records_default_to_pending() {
        let (db, _dir) = temp_db();
        IdentityRepository::new(&db)
            .upsert(ADDR, Default::default())
            .unwrap();
        let record = ActivityRepository::new(&db)
            .create(ADDR, new_activity("withdraw"))
            .unwrap();
        assert_eq!(record.status, "pending");
        assert!(ActivityRepository::new(&db).list("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc").unwrap().is_empty());
    }
}
