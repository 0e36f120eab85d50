// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Calldata compilation from named JSON arguments, and the reverse mapping
//! from ABI values back to JSON.
//!
//! Parameters are always taken in the order the interface declares them, so
//! the same arguments produce the same calldata no matter how the JSON object
//! was ordered.

use std::str::FromStr;

use alloy::dyn_abi::DynSolType;
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::{Function, Param};
use alloy::primitives::{Address, Bytes};
use serde_json::{Map, Value};

use super::abi::ContractDescriptor;
use super::error::EncodingError;
use super::types::EncodedCall;

/// Compile `args` into calldata for `entry_point`.
///
/// Presence of every declared parameter is checked before any value is
/// coerced, so an absent argument is always reported as
/// [`EncodingError::MissingArgument`].
pub fn compile_arguments(
    descriptor: &ContractDescriptor,
    entry_point: &str,
    args: &Map<String, Value>,
) -> Result<EncodedCall, EncodingError> {
    let function =
        descriptor
            .function(entry_point)
            .ok_or_else(|| EncodingError::UnknownEntryPoint {
                entry_point: entry_point.to_string(),
            })?;

    let mut present = Vec::with_capacity(function.inputs.len());
    for param in &function.inputs {
        match args.get(&param.name).filter(|v| !v.is_null()) {
            Some(value) => present.push((param, value)),
            None => {
                return Err(EncodingError::MissingArgument {
                    entry_point: entry_point.to_string(),
                    argument: param.name.clone(),
                })
            }
        }
    }

    let mut values = Vec::with_capacity(present.len());
    for (param, raw) in present {
        let ty = param_type(&param.ty, &param.components).map_err(|reason| {
            EncodingError::UnsupportedType {
                argument: param.name.clone(),
                ty: param.ty.clone(),
                reason,
            }
        })?;
        let value = coerce_value(&ty, &param.components, raw).map_err(|reason| {
            EncodingError::InvalidArgument {
                argument: param.name.clone(),
                reason,
            }
        })?;
        values.push(value);
    }

    let mut calldata = function.selector().to_vec();
    calldata.extend_from_slice(&DynSolValue::Tuple(values).abi_encode_params());

    Ok(EncodedCall {
        entry_point: entry_point.to_string(),
        calldata: Bytes::from(calldata),
    })
}

/// Decode a call's return data into JSON.
///
/// A single output is returned as-is; several outputs become an object keyed
/// by output name (or position when unnamed).
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Value, EncodingError> {
    let types = function
        .outputs
        .iter()
        .map(|p| param_type(&p.ty, &p.components))
        .collect::<Result<Vec<_>, _>>()
        .map_err(EncodingError::Abi)?;

    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(data)
        .map_err(|e| EncodingError::Abi(e.to_string()))?;
    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    if let ([param], [value]) = (function.outputs.as_slice(), values.as_slice()) {
        return Ok(to_json_with(&param.components, value));
    }
    Ok(named_object(&function.outputs, &values))
}

/// Resolve an ABI type string, building tuples from `components`.
pub(crate) fn param_type(ty: &str, components: &[Param]) -> Result<DynSolType, String> {
    if components.is_empty() {
        return DynSolType::parse(ty).map_err(|e| e.to_string());
    }

    let suffix = ty
        .strip_prefix("tuple")
        .ok_or_else(|| format!("`{ty}` declares components but is not a tuple"))?;
    let inner = components
        .iter()
        .map(|c| param_type(&c.ty, &c.components))
        .collect::<Result<Vec<_>, _>>()?;

    let mut resolved = DynSolType::Tuple(inner);
    for dim in suffix.split_terminator(']') {
        let size = dim
            .strip_prefix('[')
            .ok_or_else(|| format!("malformed array suffix in `{ty}`"))?;
        resolved = if size.is_empty() {
            DynSolType::Array(Box::new(resolved))
        } else {
            let len = size
                .parse::<usize>()
                .map_err(|e| format!("bad array length in `{ty}`: {e}"))?;
            DynSolType::FixedArray(Box::new(resolved), len)
        };
    }
    Ok(resolved)
}

/// Coerce one JSON value to the declared type.
fn coerce_value(ty: &DynSolType, components: &[Param], value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Tuple(types), Value::Object(fields)) => {
            if types.len() != components.len() {
                return Err("tuple fields cannot be matched by name".to_string());
            }
            types
                .iter()
                .zip(components)
                .map(|(t, c)| {
                    let field = fields
                        .get(&c.name)
                        .ok_or_else(|| format!("missing tuple field `{}`", c.name))?;
                    coerce_value(t, &c.components, field)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if types.len() != items.len() {
                return Err(format!(
                    "expected {} tuple elements, got {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (t, item))| {
                    let nested = components.get(i).map(|c| c.components.as_slice()).unwrap_or(&[]);
                    coerce_value(t, nested, item)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_value(inner, components, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(format!("expected {len} elements, got {}", items.len()));
            }
            items
                .iter()
                .map(|item| coerce_value(inner, components, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::Address, Value::String(s)) => Address::from_str(s.trim())
            .map(DynSolValue::Address)
            .map_err(|e| e.to_string()),
        (
            DynSolType::Tuple(_) | DynSolType::Array(_) | DynSolType::FixedArray(..),
            Value::String(s),
        ) => ty.coerce_str(s).map_err(|e| e.to_string()),
        (DynSolType::Tuple(_) | DynSolType::Array(_) | DynSolType::FixedArray(..), other) => {
            Err(format!("expected {ty}, got {other}"))
        }
        (_, Value::String(s)) => ty.coerce_str(s.trim()).map_err(|e| e.to_string()),
        (_, Value::Number(n)) => ty.coerce_str(&n.to_string()).map_err(|e| e.to_string()),
        (_, Value::Bool(b)) => ty.coerce_str(&b.to_string()).map_err(|e| e.to_string()),
        (_, other) => Err(format!("expected {ty}, got {other}")),
    }
}

/// Render an ABI value as JSON. Integers become decimal strings so that
/// 256-bit values survive JavaScript clients.
pub fn value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => Value::String(format!(
            "0x{}",
            alloy::hex::encode(&word[..(*size).min(32)])
        )),
        DynSolValue::Address(address) => Value::String(address.to_checksum(None)),
        DynSolValue::Function(f) => Value::String(format!("0x{}", alloy::hex::encode(f.as_slice()))),
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", alloy::hex::encode(bytes))),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(value_to_json).collect())
        }
        DynSolValue::CustomStruct {
            prop_names, tuple, ..
        } => Value::Object(
            prop_names
                .iter()
                .cloned()
                .zip(tuple.iter().map(value_to_json))
                .collect(),
        ),
    }
}

/// Like [`value_to_json`], but tuples become objects keyed by component name.
pub(crate) fn to_json_with(components: &[Param], value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Tuple(items) if !components.is_empty() && components.len() == items.len() => {
            named_object(components, items)
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => Value::Array(
            items
                .iter()
                .map(|item| to_json_with(components, item))
                .collect(),
        ),
        other => value_to_json(other),
    }
}

pub(crate) fn named_object(params: &[Param], values: &[DynSolValue]) -> Value {
    let mut object = Map::with_capacity(values.len());
    for (index, (param, value)) in params.iter().zip(values).enumerate() {
        let key = if param.name.is_empty() {
            index.to_string()
        } else {
            param.name.clone()
        };
        object.insert(key, to_json_with(&param.components, value));
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::abi::shipped_descriptors;
    use crate::chain::types::ContractKind;
    use alloy::primitives::U256;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn encoding_is_independent_of_argument_order() {
        let store = shipped_descriptors();
        let pool = store.load(ContractKind::LendingPool).unwrap();

        let a = compile_arguments(
            &pool,
            "deposit",
            &args(json!({
                "asset": "0x0000000000000000000000000000000000000001",
                "amount": "1000",
                "on_behalf_of": "0x0000000000000000000000000000000000000002",
            })),
        )
        .unwrap();
        let b = compile_arguments(
            &pool,
            "deposit",
            &args(json!({
                "on_behalf_of": "0x0000000000000000000000000000000000000002",
                "amount": 1000,
                "asset": "0x0000000000000000000000000000000000000001",
                "unused": true,
            })),
        )
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.calldata.len(), 4 + 3 * 32);
        assert_eq!(&a.calldata[..4], pool.function("deposit").unwrap().selector().as_slice());
        assert_eq!(U256::from_be_slice(&a.calldata[36..68]), U256::from(1000u64));
    }

    #[test]
    fn missing_argument_wins_over_invalid_values() {
        let store = shipped_descriptors();
        let pool = store.load(ContractKind::LendingPool).unwrap();

        let err = compile_arguments(
            &pool,
            "deposit",
            &args(json!({ "asset": "not-an-address", "amount": "abc" })),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EncodingError::MissingArgument {
                entry_point: "deposit".into(),
                argument: "on_behalf_of".into(),
            }
        );

        let err = compile_arguments(
            &pool,
            "deposit",
            &args(json!({ "asset": null, "amount": "1", "on_behalf_of": "0x0000000000000000000000000000000000000002" })),
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::MissingArgument { ref argument, .. } if argument == "asset"));
    }

    #[test]
    fn unknown_entry_point_and_bad_values_are_typed() {
        let store = shipped_descriptors();
        let pool = store.load(ContractKind::LendingPool).unwrap();

        let err = compile_arguments(&pool, "liquidate", &Map::new()).unwrap_err();
        assert!(matches!(err, EncodingError::UnknownEntryPoint { .. }));

        let err = compile_arguments(
            &pool,
            "deposit",
            &args(json!({
                "asset": "0x0000000000000000000000000000000000000001",
                "amount": "lots",
                "on_behalf_of": "0x0000000000000000000000000000000000000002",
            })),
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::InvalidArgument { ref argument, .. } if argument == "amount"));
    }

    #[test]
    fn tuples_accept_objects_and_arrays() {
        let abi = r#"[{"type":"function","name":"configure","stateMutability":"nonpayable","outputs":[],
            "inputs":[{"name":"config","type":"tuple","components":[
                {"name":"ltv","type":"uint256"},{"name":"active","type":"bool"}]}]}]"#;
        let descriptor = ContractDescriptor::from_json(ContractKind::ReserveData, abi).unwrap();

        let by_name = compile_arguments(
            &descriptor,
            "configure",
            &args(json!({ "config": { "active": true, "ltv": "7500" } })),
        )
        .unwrap();
        let by_position = compile_arguments(
            &descriptor,
            "configure",
            &args(json!({ "config": [7500, "true"] })),
        )
        .unwrap();
        assert_eq!(by_name, by_position);
    }

    #[test]
    fn param_type_handles_tuple_arrays() {
        let component: Param = serde_json::from_value(json!({"name": "x", "type": "uint8"})).unwrap();
        let ty = param_type("tuple[][2]", std::slice::from_ref(&component)).unwrap();
        assert_eq!(ty.to_string(), "(uint8,)[][2]");
        assert!(param_type("uint256[]", &[]).is_ok());
        assert!(param_type("address[3]", &[component]).is_err());
    }

    #[test]
    fn decode_output_names_multiple_values() {
        let abi = r#"[{"type":"function","name":"info","stateMutability":"view","inputs":[],
            "outputs":[{"name":"total","type":"uint256"},{"name":"owner","type":"address"}]}]"#;
        let descriptor = ContractDescriptor::from_json(ContractKind::Governance, abi).unwrap();
        let function = descriptor.function("info").unwrap();

        let data = DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(42u64), 256),
            DynSolValue::Address(Address::ZERO),
        ])
        .abi_encode_params();

        let decoded = decode_output(function, &data).unwrap();
        assert_eq!(decoded["total"], json!("42"));
        assert_eq!(decoded["owner"], json!(Address::ZERO.to_checksum(None)));
    }
}
