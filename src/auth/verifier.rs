// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification for login challenges.
//!
//! The client signs EIP-712 typed data whose `message.nonce` equals the nonce
//! previously issued for its address, and sends the signature as its two
//! scalars `[r, s]` together with its SEC1-encoded public key. Verification is
//! a pure function of the request, the stored identity, the expected signing
//! domain and the clock.
//!
//! Only documents of our own shape are accepted: the domain must match the
//! configured [`LoginDomain`], and the primary type must declare a
//! `wallet: address` field equal to the claimed address and a
//! `nonce: string` field. Without this, any signature the wallet produced
//! for another application over a document carrying a `nonce` key would
//! log the holder in.

use std::str::FromStr;

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use k256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::config::LoginDomain;
use crate::storage::{normalize_address, Identity};

/// Body of `POST /auth/verify`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Claimed wallet address
    pub address: String,
    /// Signature scalars `[r, s]` as hex (`0x`) or decimal strings
    pub signature: Vec<String>,
    /// The EIP-712 document that was signed
    #[schema(value_type = Object)]
    pub typed_data: TypedData,
    /// SEC1 public key, hex encoded (compressed or uncompressed)
    pub public_key: String,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Lowercase wallet address
    pub address: String,
    /// The nonce the signature was bound to
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("no outstanding nonce for this address")]
    NonceNotFound,

    #[error("nonce has expired")]
    NonceExpired,

    #[error("signed nonce does not match the issued nonce")]
    NonceMismatch,

    #[error("not a login document for this relay: {0}")]
    UntrustedDocument(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Check a login request against the stored identity.
///
/// Success does not consume the nonce; the caller must compare-and-clear it
/// before issuing a session.
pub fn verify(
    request: &LoginRequest,
    stored: Option<&Identity>,
    domain: &LoginDomain,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, VerificationError> {
    let identity = stored.ok_or(VerificationError::NonceNotFound)?;
    let expected = identity
        .nonce
        .as_deref()
        .ok_or(VerificationError::NonceNotFound)?;

    if identity.nonce_expires_at.is_some_and(|exp| now > exp) {
        return Err(VerificationError::NonceExpired);
    }

    let claimed = Address::from_str(request.address.trim())
        .map_err(|e| VerificationError::InvalidSignature(format!("address: {e}")))?;
    check_document(&request.typed_data, domain, claimed)?;

    match request.typed_data.message.get("nonce") {
        Some(serde_json::Value::String(signed)) if signed == expected => {}
        _ => return Err(VerificationError::NonceMismatch),
    }

    let hash = request
        .typed_data
        .eip712_signing_hash()
        .map_err(|e| VerificationError::InvalidSignature(format!("typed data: {e}")))?;

    let verifying_key = parse_public_key(&request.public_key)?;
    if Address::from_public_key(&verifying_key) != claimed {
        return Err(VerificationError::InvalidSignature(
            "public key does not belong to the claimed address".to_string(),
        ));
    }

    let signature = parse_signature(&request.signature)?;
    verifying_key
        .verify_prehash(hash.as_slice(), &signature)
        .map_err(|_| VerificationError::InvalidSignature("signature check failed".to_string()))?;

    Ok(VerifiedIdentity {
        address: normalize_address(&request.address).unwrap_or_else(|| identity.address.clone()),
        nonce: expected.to_string(),
    })
}

fn check_document(
    typed_data: &TypedData,
    expected: &LoginDomain,
    claimed: Address,
) -> Result<(), VerificationError> {
    let untrusted = |reason: &str| Err(VerificationError::UntrustedDocument(reason.to_string()));

    let domain = &typed_data.domain;
    if domain.name.as_deref() != Some(expected.name.as_str()) {
        return untrusted("domain name");
    }
    if domain.version.as_deref() != Some(expected.version.as_str()) {
        return untrusted("domain version");
    }
    if let Some(chain_id) = expected.chain_id {
        if domain.chain_id != Some(U256::from(chain_id)) {
            return untrusted("domain chain id");
        }
    }

    let primary = typed_data.primary_type.as_str();
    let declared = typed_data
        .resolver
        .linearize(primary)
        .ok()
        .and_then(|defs| defs.into_iter().find(|def| def.type_name() == primary))
        .ok_or_else(|| VerificationError::UntrustedDocument("primary type is not declared".to_string()))?;
    let declares = |name: &str, ty: &str| {
        declared
            .props()
            .iter()
            .any(|prop| prop.name() == name && prop.type_name() == ty)
    };
    if !declares("wallet", "address") || !declares("nonce", "string") {
        return untrusted("primary type must declare wallet: address and nonce: string");
    }

    let wallet = typed_data
        .message
        .get("wallet")
        .and_then(|v| v.as_str())
        .and_then(|raw| Address::from_str(raw.trim()).ok());
    if wallet != Some(claimed) {
        return untrusted("signed wallet is not the claimed address");
    }
    Ok(())
}

fn parse_public_key(raw: &str) -> Result<VerifyingKey, VerificationError> {
    let bytes = alloy::hex::decode(raw.trim())
        .map_err(|e| VerificationError::InvalidSignature(format!("public key: {e}")))?;
    VerifyingKey::from_sec1_bytes(&bytes)
        .map_err(|_| VerificationError::InvalidSignature("public key is not a curve point".to_string()))
}

fn parse_signature(scalars: &[String]) -> Result<Signature, VerificationError> {
    let [r, s] = scalars else {
        return Err(VerificationError::InvalidSignature(format!(
            "expected 2 signature scalars, got {}",
            scalars.len()
        )));
    };
    let scalar = |raw: &str| {
        U256::from_str(raw.trim())
            .map(|v| k256::FieldBytes::from(v.to_be_bytes::<32>()))
            .map_err(|e| VerificationError::InvalidSignature(format!("scalar: {e}")))
    };

    let signature = Signature::from_scalars(scalar(r)?, scalar(s)?)
        .map_err(|_| VerificationError::InvalidSignature("scalars out of range".to_string()))?;
    // Wallets may emit either s; only the low form verifies
    Ok(signature.normalize_s().unwrap_or(signature))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Builds correctly signed login requests.

    use super::*;
    use k256::ecdsa::{signature::hazmat::PrehashSigner, SigningKey};
    use serde_json::json;

    pub fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    pub fn address_of(key: &SigningKey) -> String {
        normalize_address(&Address::from_public_key(key.verifying_key()).to_string()).unwrap()
    }

    pub fn typed_data(wallet: &str, nonce: serde_json::Value) -> TypedData {
        serde_json::from_value(json!({
            "types": {
                "Login": [
                    { "name": "wallet", "type": "address" },
                    { "name": "nonce", "type": "string" }
                ]
            },
            "primaryType": "Login",
            "domain": { "name": "VeiLend", "version": "1", "chainId": "0x1" },
            "message": { "wallet": wallet, "nonce": nonce }
        }))
        .unwrap()
    }

    pub fn signed_login(key: &SigningKey, nonce: &str) -> LoginRequest {
        sign(key, typed_data(&address_of(key), json!(nonce)))
    }

    /// Sign `typed_data` with `key` and present it as a login for the key's address.
    pub fn sign(key: &SigningKey, typed_data: TypedData) -> LoginRequest {
        let address = address_of(key);
        let hash = typed_data.eip712_signing_hash().unwrap();
        let signature: Signature = key.sign_prehash(hash.as_slice()).unwrap();
        let (r, s) = signature.split_bytes();

        LoginRequest {
            address,
            signature: vec![
                format!("0x{}", alloy::hex::encode(r)),
                format!("0x{}", alloy::hex::encode(s)),
            ],
            typed_data,
            public_key: alloy::hex::encode(
                key.verifying_key().to_encoded_point(false).as_bytes(),
            ),
        }
    }
}
