// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded relay database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `identities`: lowercase address → serialized Identity
//! - `activity`: record id → serialized ActivityRecord
//! - `activity_index`: composite key (address|!timestamp|id) → record id
//! - `positions`: composite key (address|collateral) → serialized PositionRecord

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary identity table: lowercase address → Identity (JSON bytes).
pub(super) const IDENTITIES: TableDefinition<&str, &[u8]> = TableDefinition::new("identities");

/// Activity records: record id → ActivityRecord (JSON bytes).
pub(super) const ACTIVITY: TableDefinition<&str, &[u8]> = TableDefinition::new("activity");

/// Index: `address|!timestamp_be|id` → record id, for newest-first scans.
pub(super) const ACTIVITY_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("activity_index");

/// Open positions: `address|collateral` → PositionRecord (JSON bytes).
pub(super) const POSITIONS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("positions");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// RelayDatabase
// =============================================================================

/// Embedded ACID database holding identities and activity history.
///
/// redb admits one write transaction at a time, so every read-modify-write
/// performed inside a single write transaction is atomic with respect to
/// other writers.
pub struct RelayDatabase {
    db: Database,
}

impl RelayDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(IDENTITIES)?;
            let _ = write_txn.open_table(ACTIVITY)?;
            let _ = write_txn.open_table(ACTIVITY_INDEX)?;
            let _ = write_txn.open_table(POSITIONS)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "relay database opened");
        Ok(Self { db })
    }

    /// Check the database can serve a read transaction.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(IDENTITIES)?;
        Ok(())
    }

    pub(super) fn inner(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the activity index.
///
/// Format: `lowercase_address | inverted_timestamp_be_bytes | id`
pub(super) fn make_index_key(address: &str, timestamp_millis: i64, id: &str) -> Vec<u8> {
    let addr = address.to_lowercase();
    let mut key = Vec::with_capacity(addr.len() + 1 + 8 + 1 + id.len());
    key.extend_from_slice(addr.as_bytes());
    key.push(b'|');
    // Inverted so that a forward scan yields newest first
    key.extend_from_slice(&(!timestamp_millis as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(id.as_bytes());
    key
}

/// Build a `address|part` key.
pub(super) fn make_key(address: &str, part: &str) -> Vec<u8> {
    let addr = address.to_lowercase();
    let mut key = Vec::with_capacity(addr.len() + 1 + part.len());
    key.extend_from_slice(addr.as_bytes());
    key.push(b'|');
    key.extend_from_slice(part.as_bytes());
    key
}

/// Inclusive lower and exclusive upper bound covering one address.
pub(super) fn prefix_range(address: &str) -> (Vec<u8>, Vec<u8>) {
    let addr = address.to_lowercase();
    let mut start = Vec::with_capacity(addr.len() + 1);
    start.extend_from_slice(addr.as_bytes());
    start.push(b'|');

    let mut end = start.clone();
    // Past any valid key with this prefix
    end.extend_from_slice(&[0xFF; 20]);
    (start, end)
}

#[cfg(test)]
pub(crate) fn temp_db() -> (RelayDatabase, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = RelayDatabase::open(&dir.path().join("relay.redb")).unwrap();
    (db, dir)
}
