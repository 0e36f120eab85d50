// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors raised by the chain gateway.

use std::time::Duration;

use alloy::primitives::B256;
use axum::http::StatusCode;

use super::types::ContractKind;

/// Failure to turn named JSON arguments into calldata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("Entry point `{entry_point}` is not declared by the contract interface")]
    UnknownEntryPoint { entry_point: String },

    #[error("Missing argument `{argument}` for `{entry_point}`")]
    MissingArgument {
        entry_point: String,
        argument: String,
    },

    #[error("Invalid value for `{argument}`: {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Unsupported type `{ty}` for `{argument}`: {reason}")]
    UnsupportedType {
        argument: String,
        ty: String,
        reason: String,
    },

    #[error("ABI error: {0}")]
    Abi(String),
}

/// Errors that can occur while resolving, reading or writing contracts.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Contract interface for {kind} could not be loaded: {reason}")]
    DescriptorNotFound { kind: ContractKind, reason: String },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Administrative signing credential is not configured")]
    MissingCredential,

    #[error("Invalid administrative credential: {0}")]
    InvalidCredential(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Transaction confirmation failed: {0}")]
    Confirmation(String),

    #[error("Transaction was not accepted by the node within {after:?}")]
    SubmissionTimeout { after: Duration },

    #[error("Transaction {hash} was not confirmed within {after:?}")]
    ConfirmationTimeout { hash: B256, after: Duration },

    #[error("Contract call failed: {0}")]
    Call(String),
}

impl ChainError {
    /// Stable machine-readable code for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ChainError::DescriptorNotFound { .. } => "descriptor_not_found",
            ChainError::Encoding(_) => "encoding_error",
            ChainError::InvalidAddress(_) => "invalid_address",
            ChainError::MissingCredential => "missing_credential",
            ChainError::InvalidCredential(_) => "invalid_credential",
            ChainError::InvalidRpcUrl(_) => "invalid_rpc_url",
            ChainError::Submission(_) => "submission_failed",
            ChainError::Confirmation(_) => "confirmation_failed",
            ChainError::SubmissionTimeout { .. } => "submission_timeout",
            ChainError::ConfirmationTimeout { .. } => "confirmation_timeout",
            ChainError::Call(_) => "call_failed",
        }
    }

    /// HTTP status the failure maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChainError::DescriptorNotFound { .. }
            | ChainError::MissingCredential
            | ChainError::InvalidCredential(_)
            | ChainError::InvalidRpcUrl(_) => StatusCode::SERVICE_UNAVAILABLE,
            ChainError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ChainError::Submission(_) | ChainError::Confirmation(_) | ChainError::Call(_) => {
                StatusCode::BAD_GATEWAY
            }
            ChainError::SubmissionTimeout { .. } | ChainError::ConfirmationTimeout { .. } => {
                StatusCode::GATEWAY_TIMEOUT
            }
        }
    }
}
