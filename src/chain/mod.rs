// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Chain Module
//!
//! Everything the relay does on-chain goes through [`ChainGateway`]:
//!
//! 1. Resolve the contract's JSON ABI from `ABI_DIR` (cached)
//! 2. Compile named JSON arguments into calldata, in ABI order
//! 3. Sign with the administrative credential and submit
//! 4. Wait for inclusion, bounded by `TX_CONFIRMATION_TIMEOUT_SECS`
//! 5. Decode receipt logs into events, falling back to raw logs
//!
//! Reads bind a [`ContractBinding`]; without an RPC endpoint the binding is
//! descriptor-only and reads degrade instead of failing.

pub mod abi;
pub mod encoding;
pub mod error;
pub mod events;
pub mod gateway;
pub mod signing;
pub mod submitter;
pub mod types;

pub use abi::{ContractDescriptor, DescriptorStore};
pub use encoding::compile_arguments;
pub use error::{ChainError, EncodingError};
pub use events::{AbiEventDecoder, DecodeFailure, EventDecoder};
pub use gateway::{ChainGateway, ContractBinding, LiveContract};
pub use submitter::{AlloySubmitter, TransactionSubmitter};
pub use types::{
    ContractKind, DecodedEvent, EncodedCall, RawLog, RawReceipt, TransactionEvents,
    TransactionOutcome, TransactionRequest,
};
