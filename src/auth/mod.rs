// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Wallet-signature login for the VeiLend relay.
//!
//! ## Auth Flow
//!
//! 1. Client calls `POST /auth/nonce?address=0x…` and receives a nonce
//! 2. Client signs EIP-712 typed data whose `message.nonce` is that nonce
//! 3. Client sends `POST /auth/verify` with the signature scalars `[r, s]`,
//!    the typed data and its public key
//! 4. Server:
//!    - Checks the nonce exists, is unexpired and matches the signed message
//!    - Recomputes the typed-data hash and verifies the signature against
//!      the public key, which must derive the claimed address
//!    - Atomically clears the nonce; only the caller that clears it proceeds
//!    - Issues an HS256 session token (`sub` = address)
//!
//! ## Security
//!
//! - Nonces are single-use and expire after `NONCE_TTL_SECS`
//! - Every login failure returns the same 401 body; reasons are only logged
//! - Clock skew tolerance for session tokens is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod service;
pub mod session;
pub mod verifier;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use service::{AuthService, NonceChallenge};
pub use session::{AccessToken, SessionIssuer};
pub use verifier::{verify, LoginRequest, VerificationError, VerifiedIdentity};
