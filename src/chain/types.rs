// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Types shared across the chain gateway.

use std::fmt;

use alloy::primitives::{Address, Bytes, B256};
use serde::Serialize;
use utoipa::ToSchema;

/// The contracts the relay knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    LendingPool,
    ShieldedPool,
    PriceOracle,
    Governance,
    InterestToken,
    ReserveData,
    AddressesProvider,
}

impl ContractKind {
    pub const ALL: [ContractKind; 7] = [
        ContractKind::LendingPool,
        ContractKind::ShieldedPool,
        ContractKind::PriceOracle,
        ContractKind::Governance,
        ContractKind::InterestToken,
        ContractKind::ReserveData,
        ContractKind::AddressesProvider,
    ];

    /// File name of the interface descriptor inside `ABI_DIR`.
    pub fn descriptor_file(&self) -> &'static str {
        match self {
            ContractKind::LendingPool => "LendingPool_ABI.json",
            ContractKind::ShieldedPool => "ShieldedPool_ABI.json",
            ContractKind::PriceOracle => "PriceOracle_ABI.json",
            ContractKind::Governance => "VEILENDGOV_ABI.json",
            ContractKind::InterestToken => "InterestToken_ABI.json",
            ContractKind::ReserveData => "ReserveData_ABI.json",
            ContractKind::AddressesProvider => "AddressesProvider_ABI.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::LendingPool => "lending_pool",
            ContractKind::ShieldedPool => "shielded_pool",
            ContractKind::PriceOracle => "price_oracle",
            ContractKind::Governance => "governance",
            ContractKind::InterestToken => "interest_token",
            ContractKind::ReserveData => "reserve_data",
            ContractKind::AddressesProvider => "addresses_provider",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calldata compiled for one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub entry_point: String,
    pub calldata: Bytes,
}

/// A call transaction ready for submission.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub target: Address,
    pub call: EncodedCall,
}

/// A log exactly as it appeared in the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Receipt fields the relay reports back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RawReceipt {
    pub transaction_hash: B256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// `true` when execution succeeded
    pub status: bool,
    pub logs: Vec<RawLog>,
}

/// An event decoded against the contract interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedEvent {
    pub name: String,
    pub address: Address,
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// Decoded events, or the raw logs when decoding could not run at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionEvents {
    Decoded(Vec<DecodedEvent>),
    Raw(Vec<RawLog>),
}

/// Result of a confirmed write.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionOutcome {
    #[schema(value_type = String, example = "0x5c50...e2a1")]
    pub transaction_hash: B256,
    #[schema(value_type = Object)]
    pub receipt: RawReceipt,
    #[schema(value_type = Vec<Object>)]
    pub events: TransactionEvents,
}
