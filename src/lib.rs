// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! VeiLend Relay - Lending & Shielded Pool Backend
//!
//! REST relay in front of the VeiLend contract suite. Wallets log in by
//! signing an EIP-712 challenge; state-changing contract calls are signed by a
//! single admin key and confirmed before the response is returned.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `auth` - Nonce challenges, signature verification and session tokens
//! - `chain` - ABI descriptors, calldata encoding, submission and event decoding
//! - `services` - One service per VeiLend contract
//! - `storage` - Identities and activity history (redb)

pub mod api;
pub mod auth;
pub mod chain;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
