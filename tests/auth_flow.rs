// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end login through the public router.

use std::sync::Arc;

use alloy::dyn_abi::TypedData;
use alloy::primitives::Address;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use serde_json::{json, Value};
use tower::ServiceExt;

use veilend_relay::{
    api::router,
    chain::{AlloySubmitter, ChainGateway, DescriptorStore},
    config::AppConfig,
    state::AppState,
    storage::RelayDatabase,
};

fn app(dir: &tempfile::TempDir) -> Router {
    let config = AppConfig::from_lookup(|_| None).unwrap();
    let db = RelayDatabase::open(&dir.path().join("relay.redb")).unwrap();
    let abis = concat!(env!("CARGO_MANIFEST_DIR"), "/abis");
    let gateway = ChainGateway::new(DescriptorStore::new(abis), None, None, Arc::new(AlloySubmitter));
    router(AppState::new(config, db, gateway))
}

async fn call(app: &Router, method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn login_body(key: &SigningKey, nonce: &str) -> Value {
    let address = Address::from_public_key(key.verifying_key()).to_string().to_lowercase();
    let typed_data: TypedData = serde_json::from_value(json!({
        "types": {
            "Login": [
                { "name": "wallet", "type": "address" },
                { "name": "nonce", "type": "string" }
            ]
        },
        "primaryType": "Login",
        "domain": { "name": "VeiLend", "version": "1", "chainId": "0x1" },
        "message": { "wallet": address, "nonce": nonce }
    }))
    .unwrap();

    let hash = typed_data.eip712_signing_hash().unwrap();
    let signature: Signature = key.sign_prehash(hash.as_slice()).unwrap();
    let (r, s) = signature.split_bytes();

    json!({
        "address": address,
        "signature": [
            format!("0x{}", alloy::hex::encode(r)),
            format!("0x{}", alloy::hex::encode(s)),
        ],
        "typedData": typed_data,
        "publicKey": alloy::hex::encode(key.verifying_key().to_encoded_point(true).as_bytes()),
    })
}

#[tokio::test]
async fn wallet_login_grants_a_single_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let key = SigningKey::from_slice(&[42u8; 32]).unwrap();
    let address = Address::from_public_key(key.verifying_key()).to_string();

    let (status, challenge) = call(&app, "POST", &format!("/auth/nonce?address={address}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let nonce = challenge["nonce"].as_str().unwrap().to_string();

    let body = login_body(&key, &nonce);
    let (status, token) = call(&app, "POST", "/auth/verify", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let bearer = format!("Bearer {}", token["access_token"].as_str().unwrap());

    let (status, profile) = call(&app, "GET", "/users/profile", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["address"], address.to_lowercase());

    // The nonce was consumed by the first login
    let (status, _) = call(&app, "POST", "/auth/verify", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signature_over_a_stale_nonce_is_denied() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let key = SigningKey::from_slice(&[43u8; 32]).unwrap();
    let address = Address::from_public_key(key.verifying_key()).to_string();

    let (_, first) = call(&app, "POST", &format!("/auth/nonce?address={address}"), None, None).await;
    let stale = first["nonce"].as_str().unwrap().to_string();
    // Re-issuing replaces the stored nonce
    let (_, second) = call(&app, "POST", &format!("/auth/nonce?address={address}"), None, None).await;
    assert_ne!(second["nonce"], first["nonce"]);

    let (status, denied) = call(&app, "POST", "/auth/verify", None, Some(login_body(&key, &stale))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied["error_code"], "authentication_denied");
}

#[tokio::test]
async fn writes_without_a_session_are_rejected_and_reads_degrade() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let pool = "0x1111111111111111111111111111111111111111";

    let (status, _) = call(
        &app,
        "POST",
        "/lending-pool/deposit",
        None,
        Some(json!({ "contract": pool, "asset": pool, "amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "GET", &format!("/governance/total-supply?contract={pool}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["info"].is_string());
}
