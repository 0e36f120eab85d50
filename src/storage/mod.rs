// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state lives in a single redb file (`DATABASE_PATH`).
//!
//! ## Layout
//!
//! ```text
//! identities       address → Identity (profile + outstanding login nonce)
//! activity         id → ActivityRecord
//! activity_index   address|!timestamp|id → id
//! positions        address|collateral → PositionRecord
//! ```
//!
//! Repositories borrow the database for the duration of one call.

pub mod activity;
pub mod database;
pub mod identities;
pub mod positions;

pub use activity::{ActivityRecord, ActivityRepository, NewActivity};
pub use database::{DbError, DbResult, RelayDatabase};
pub use identities::{normalize_address, Identity, IdentityPatch, IdentityRepository};
pub use positions::{PositionRecord, PositionRepository, PositionUpdate};
