// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read and write plumbing shared by every domain service.

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::chain::{
    ChainError, ChainGateway, ContractBinding, ContractKind, TransactionOutcome, TransactionRequest,
};
use crate::error::ApiError;

/// Informational payload for reads against a descriptor-only binding.
pub const NETWORK_UNREACHABLE_INFO: &str = "interface loaded; network unreachable";

/// Result of a contract read. Reads never fail at the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadOutcome {
    /// Decoded return value
    Value(Value),
    /// No usable RPC endpoint; the interface itself is known
    Informational { info: &'static str },
    /// The call failed or the interface is missing (`null`)
    Unavailable,
}

impl IntoResponse for ReadOutcome {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Why a write did not confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub kind: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl From<ChainError> for WriteFailure {
    fn from(err: ChainError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            status: err.status_code(),
        }
    }
}

/// Result of a contract write.
#[derive(Debug, Clone)]
pub enum WriteOutcome {
    Confirmed(TransactionOutcome),
    Failed(WriteFailure),
}

impl WriteOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, WriteOutcome::Confirmed(_))
    }

    pub fn failure(&self) -> Option<&WriteFailure> {
        match self {
            WriteOutcome::Failed(failure) => Some(failure),
            WriteOutcome::Confirmed(_) => None,
        }
    }
}

impl IntoResponse for WriteOutcome {
    fn into_response(self) -> Response {
        match self {
            WriteOutcome::Confirmed(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
            WriteOutcome::Failed(failure) => {
                ApiError::new(failure.status, failure.kind, failure.message).into_response()
            }
        }
    }
}

/// One contract kind bound to the shared gateway.
pub struct ContractService {
    kind: ContractKind,
    gateway: Arc<ChainGateway>,
}

impl ContractService {
    pub fn new(kind: ContractKind, gateway: Arc<ChainGateway>) -> Self {
        Self { kind, gateway }
    }

    /// Call a read-only entry point on `contract`.
    pub async fn read(&self, contract: &str, entry_point: &str, args: Map<String, Value>) -> ReadOutcome {
        let Some(binding) = self.gateway.bind_contract(self.kind, contract) else {
            return ReadOutcome::Unavailable;
        };

        match binding {
            ContractBinding::Live(live) => match live.call(entry_point, &args).await {
                Ok(value) => ReadOutcome::Value(value),
                Err(e) => {
                    tracing::warn!(
                        kind = %self.kind,
                        %entry_point,
                        %contract,
                        error = %e,
                        "contract read failed"
                    );
                    ReadOutcome::Unavailable
                }
            },
            ContractBinding::DescriptorOnly { .. } => ReadOutcome::Informational {
                info: NETWORK_UNREACHABLE_INFO,
            },
        }
    }

    /// Compile, submit and confirm a write to `contract`.
    ///
    /// Every failure is returned as [`WriteOutcome::Failed`].
    pub async fn write(&self, contract: &str, entry_point: &str, args: Map<String, Value>) -> WriteOutcome {
        match self.try_write(contract, entry_point, &args).await {
            Ok(outcome) => WriteOutcome::Confirmed(outcome),
            Err(e) => {
                tracing::error!(
                    kind = %self.kind,
                    %entry_point,
                    %contract,
                    error = %e,
                    "contract write failed"
                );
                WriteOutcome::Failed(e.into())
            }
        }
    }

    async fn try_write(
        &self,
        contract: &str,
        entry_point: &str,
        args: &Map<String, Value>,
    ) -> Result<TransactionOutcome, ChainError> {
        let descriptor = self.gateway.resolve_interface(self.kind)?;
        let target = Address::from_str(contract.trim())
            .map_err(|e| ChainError::InvalidAddress(format!("{contract}: {e}")))?;
        let call = self.gateway.compile_arguments(&descriptor, entry_point, args)?;

        self.gateway
            .execute(TransactionRequest { target, call }, &descriptor)
            .await
    }
}

/// Build a named-argument map from `(name, value)` pairs.
pub(crate) fn named_args<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
