// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Receipt log decoding.
//!
//! A receipt may carry logs this relay cannot interpret (proxy events,
//! token transfers emitted by other contracts). Those are dropped one by
//! one; only when decoding cannot run at all are the raw logs returned.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::json_abi::Event;
use alloy::primitives::B256;
use serde_json::Map;

use super::abi::ContractDescriptor;
use super::encoding::{param_type, to_json_with};
use super::types::{DecodedEvent, RawLog, TransactionEvents};

/// Why a log (or a whole receipt) could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeFailure {
    #[error("log carries no topics")]
    Anonymous,

    #[error("no event with selector {0} in the contract interface")]
    UnknownEvent(B256),

    #[error("malformed log for `{event}`: {reason}")]
    Malformed { event: String, reason: String },

    #[error("contract interface for {0} declares no events")]
    NoEventsDeclared(String),
}

/// Turns raw receipt logs into named events.
pub trait EventDecoder: Send + Sync {
    /// Decode one log against the descriptor.
    fn decode(
        &self,
        descriptor: &ContractDescriptor,
        log: &RawLog,
    ) -> Result<DecodedEvent, DecodeFailure>;

    /// Decode every log, skipping those that fail individually.
    ///
    /// An error means the pass as a whole could not run.
    fn decode_all(
        &self,
        descriptor: &ContractDescriptor,
        logs: &[RawLog],
    ) -> Result<Vec<DecodedEvent>, DecodeFailure> {
        if !logs.is_empty() && descriptor.abi().events().next().is_none() {
            return Err(DecodeFailure::NoEventsDeclared(descriptor.kind().to_string()));
        }

        let mut decoded = Vec::with_capacity(logs.len());
        for log in logs {
            match self.decode(descriptor, log) {
                Ok(event) => decoded.push(event),
                Err(e) => tracing::debug!(address = %log.address, error = %e, "skipping undecodable log"),
            }
        }
        Ok(decoded)
    }

    /// Decoded events, falling back to the raw logs when the pass fails.
    fn decode_receipt(&self, descriptor: &ContractDescriptor, logs: &[RawLog]) -> TransactionEvents {
        match self.decode_all(descriptor, logs) {
            Ok(events) => TransactionEvents::Decoded(events),
            Err(e) => {
                tracing::warn!(kind = %descriptor.kind(), error = %e, "event decoding failed, returning raw logs");
                TransactionEvents::Raw(logs.to_vec())
            }
        }
    }
}

/// Decodes logs by matching `topic0` against the interface's event selectors.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbiEventDecoder;

impl EventDecoder for AbiEventDecoder {
    fn decode(
        &self,
        descriptor: &ContractDescriptor,
        log: &RawLog,
    ) -> Result<DecodedEvent, DecodeFailure> {
        let selector = *log.topics.first().ok_or(DecodeFailure::Anonymous)?;
        let event = descriptor
            .abi()
            .events()
            .find(|e| !e.anonymous && e.selector() == selector)
            .ok_or(DecodeFailure::UnknownEvent(selector))?;

        let args = decode_event(event, &log.topics[1..], &log.data).map_err(|reason| {
            DecodeFailure::Malformed {
                event: event.name.clone(),
                reason,
            }
        })?;

        Ok(DecodedEvent {
            name: event.name.clone(),
            address: log.address,
            args,
        })
    }
}

fn decode_event(
    event: &Event,
    topics: &[B256],
    data: &[u8],
) -> Result<Map<String, serde_json::Value>, String> {
    let indexed_count = event.inputs.iter().filter(|p| p.indexed).count();
    if topics.len() != indexed_count {
        return Err(format!(
            "expected {indexed_count} indexed topics, got {}",
            topics.len()
        ));
    }

    let body_types = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| param_type(&p.ty, &p.components))
        .collect::<Result<Vec<_>, _>>()?;
    let body = match DynSolType::Tuple(body_types)
        .abi_decode_params(data)
        .map_err(|e| e.to_string())?
    {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    let mut topics = topics.iter();
    let mut body = body.into_iter();
    let mut args = Map::with_capacity(event.inputs.len());
    for (index, param) in event.inputs.iter().enumerate() {
        let value = if param.indexed {
            let topic = topics.next().ok_or("topic underflow")?;
            let ty = param_type(&param.ty, &param.components)?;
            decode_topic(&ty, topic)?
        } else {
            body.next().ok_or("data underflow")?
        };
        let key = if param.name.is_empty() {
            index.to_string()
        } else {
            param.name.clone()
        };
        args.insert(key, to_json_with(&param.components, &value));
    }
    Ok(args)
}

/// Value types are stored in the topic verbatim; everything else is hashed.
fn decode_topic(ty: &DynSolType, topic: &B256) -> Result<DynSolValue, String> {
    match ty {
        DynSolType::Address
        | DynSolType::Bool
        | DynSolType::Int(_)
        | DynSolType::Uint(_)
        | DynSolType::FixedBytes(_)
        | DynSolType::Function => ty.abi_decode(topic.as_slice()).map_err(|e| e.to_string()),
        _ => Ok(DynSolValue::FixedBytes(*topic, 32)),
    }
}
