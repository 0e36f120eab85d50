// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Price oracle endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::Quantity;
use crate::{
    auth::Auth,
    services::{ReadOutcome, WriteOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PriceQuery {
    /// Oracle contract address
    pub contract: String,
    pub asset: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPriceRequest {
    pub contract: String,
    pub asset: String,
    pub price: Quantity,
}

/// `assets[i]` is priced at `prices[i]`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPricesRequest {
    pub contract: String,
    pub assets: Vec<String>,
    pub prices: Vec<Quantity>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPriceSourceRequest {
    pub contract: String,
    pub asset: String,
    pub source: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStalenessRequest {
    pub contract: String,
    /// Seconds after which a price is considered stale
    pub new_threshold: Quantity,
}

#[utoipa::path(
    get,
    path = "/price-oracle/price",
    tag = "PriceOracle",
    params(PriceQuery),
    responses(
        (status = 200, description = "Asset price, null, or an informational stub", body = Object)
    )
)]
pub async fn price(State(state): State<AppState>, Query(query): Query<PriceQuery>) -> ReadOutcome {
    state.services.price_oracle.price(&query.contract, &query.asset).await
}

#[utoipa::path(
    post,
    path = "/price-oracle/set-price",
    tag = "PriceOracle",
    security(("bearer" = [])),
    request_body = SetPriceRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn set_price(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetPriceRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, asset = %req.asset, "set price");
    state
        .services
        .price_oracle
        .set_price(&req.contract, &req.asset, req.price.into())
        .await
}

#[utoipa::path(
    post,
    path = "/price-oracle/set-prices",
    tag = "PriceOracle",
    security(("bearer" = [])),
    request_body = SetPricesRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Submission or confirmation failed")
    )
)]
pub async fn set_prices(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetPricesRequest>,
) -> WriteOutcome {
    tracing::info!(caller = %caller.address, contract = %req.contract, count = req.assets.len(), "set prices");
    let prices: Vec<Value> = req.prices.into_iter().map(Value::from).collect();
    state
        .services
        .price_oracle
        .set_prices(&req.contract, req.assets, prices)
        .await
}

#[utoipa::path(
    post,
    path = "/price-oracle/set-price-source",
    tag = "PriceOracle",
    security(("bearer" = [])),
    request_body = SetPriceSourceRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_price_source(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetPriceSourceRequest>,
) -> WriteOutcome {
    state
        .services
        .price_oracle
        .set_price_source(&req.contract, &req.asset, &req.source)
        .await
}

#[utoipa::path(
    post,
    path = "/price-oracle/set-staleness",
    tag = "PriceOracle",
    security(("bearer" = [])),
    request_body = SetStalenessRequest,
    responses(
        (status = 200, description = "Transaction confirmed", body = crate::chain::TransactionOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_staleness(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(req): Json<SetStalenessRequest>,
) -> WriteOutcome {
    state
        .services
        .price_oracle
        .set_staleness_threshold(&req.contract, req.new_threshold.into())
        .await
}

#[cfg(test)]
mod tests {
    use crate::api::{
        router,
        testing::{bearer, send},
    };
    use crate::chain::gateway::testing::{gateway, Behaviour, MockSubmitter};
    use crate::state::{test_state, test_state_with};
    use axum::http::StatusCode;
    use serde_json::json;

    const ORACLE: &str = "0x4444444444444444444444444444444444444444";
    const ASSET: &str = "0x2222222222222222222222222222222222222222";

    #[tokio::test]
    async fn batch_update_is_confirmed() {
        let (state, _dir) = test_state();
        let auth = bearer(&state);
        let body = json!({
            "contract": ORACLE,
            "assets": [ASSET, ORACLE],
            "prices": [100, "2000000000000000000000"]
        });

        let (status, outcome) =
            send(router(state), "POST", "/price-oracle/set-prices", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["receipt"]["status"], true);
    }

    #[tokio::test]
    async fn staleness_without_credential_is_unavailable() {
        let (state, _dir) = test_state_with(gateway(MockSubmitter::new(Behaviour::Hang), None));
        let auth = bearer(&state);
        let body = json!({ "contract": ORACLE, "newThreshold": 3600 });

        let (status, error) =
            send(router(state), "POST", "/price-oracle/set-staleness", Some(&auth), Some(body)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error["error_code"], "missing_credential");
    }

    #[tokio::test]
    async fn price_read_is_public() {
        let (state, _dir) = test_state();
        let uri = format!("/price-oracle/price?contract={ORACLE}&asset={ASSET}");
        let (status, body) = send(router(state), "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["info"].is_string());
    }
}
