// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AccessToken, LoginRequest, NonceChallenge},
    chain::TransactionOutcome,
    state::AppState,
    storage::{ActivityRecord, IdentityPatch, NewActivity, PositionRecord, PositionUpdate},
};

pub mod addresses_provider;
pub mod assets;
pub mod auth;
pub mod governance;
pub mod health;
pub mod interest_token;
pub mod lending_pool;
pub mod positions;
pub mod price_oracle;
pub mod reserve_data;
pub mod shielded_pool;
pub mod transactions;
pub mod users;

/// An integer amount: a JSON number or a decimal / `0x` hex string.
///
/// Strings carry values beyond `u64` (e.g. 27-decimal ray indices).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Quantity {
    Number(u64),
    Text(String),
}

impl From<Quantity> for Value {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Number(n) => Value::from(n),
            Quantity::Text(s) => Value::String(s),
        }
    }
}

/// `?contract=` for reads that need nothing else.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ContractQuery {
    /// Deployed contract address
    pub contract: String,
}

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/nonce", post(auth::request_nonce))
        .route("/verify", post(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile));

    let lending_pool_routes = Router::new()
        .route("/user-data", get(lending_pool::user_data))
        .route("/deposit", post(lending_pool::deposit))
        .route("/withdraw", post(lending_pool::withdraw))
        .route("/borrow", post(lending_pool::borrow))
        .route("/repay", post(lending_pool::repay));

    let shielded_pool_routes = Router::new()
        .route("/commitment/{contract}/{commitment}", get(shielded_pool::commitment))
        .route("/nullifier/{contract}/{nullifier}", get(shielded_pool::nullifier))
        .route("/merkle-root", get(shielded_pool::merkle_root))
        .route("/deposit", post(shielded_pool::deposit))
        .route("/withdraw", post(shielded_pool::withdraw))
        .route("/add-supported-asset", post(shielded_pool::add_supported_asset))
        .route("/remove-supported-asset", post(shielded_pool::remove_supported_asset))
        .route("/set-deposit-limits", post(shielded_pool::set_deposit_limits))
        .route("/set-deposit-fee", post(shielded_pool::set_deposit_fee))
        .route("/set-fee-collector", post(shielded_pool::set_fee_collector))
        .route("/emergency-withdraw", post(shielded_pool::emergency_withdraw));

    let price_oracle_routes = Router::new()
        .route("/price", get(price_oracle::price))
        .route("/set-price", post(price_oracle::set_price))
        .route("/set-prices", post(price_oracle::set_prices))
        .route("/set-price-source", post(price_oracle::set_price_source))
        .route("/set-staleness", post(price_oracle::set_staleness));

    let governance_routes = Router::new()
        .route("/total-supply", get(governance::total_supply))
        .route("/mint", post(governance::mint))
        .route("/burn", post(governance::burn));

    let interest_token_routes = Router::new()
        .route("/scaled-balance", get(interest_token::scaled_balance))
        .route("/mint", post(interest_token::mint))
        .route("/burn", post(interest_token::burn))
        .route("/set-liquidity", post(interest_token::set_liquidity));

    let reserve_data_routes = Router::new()
        .route("/config", get(reserve_data::config))
        .route("/set-config", post(reserve_data::set_config))
        .route("/set-state", post(reserve_data::set_state))
        .route("/set-user-data", post(reserve_data::set_user_data));

    let addresses_provider_routes = Router::new()
        .route("/all", get(addresses_provider::all))
        .route("/set-lending-pool", post(addresses_provider::set_lending_pool))
        .route("/set-shielded-pool", post(addresses_provider::set_shielded_pool))
        .route("/set-price-oracle", post(addresses_provider::set_price_oracle));

    let app_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes)
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/positions",
            get(positions::list_positions).post(positions::upsert_position),
        )
        .route("/assets", get(assets::list_assets))
        .nest("/lending-pool", lending_pool_routes)
        .nest("/shielded-pool", shielded_pool_routes)
        .nest("/price-oracle", price_oracle_routes)
        .nest("/governance", governance_routes)
        .nest("/interest-token", interest_token_routes)
        .nest("/reserve-data", reserve_data_routes)
        .nest("/addresses-provider", addresses_provider_routes)
        .with_state(state);

    Router::new()
        .merge(app_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::request_nonce,
        auth::verify,
        auth::logout,
        auth::profile,
        users::get_profile,
        users::update_profile,
        transactions::list_transactions,
        transactions::create_transaction,
        positions::list_positions,
        positions::upsert_position,
        assets::list_assets,
        lending_pool::user_data,
        lending_pool::deposit,
        lending_pool::withdraw,
        lending_pool::borrow,
        lending_pool::repay,
        shielded_pool::commitment,
        shielded_pool::nullifier,
        shielded_pool::merkle_root,
        shielded_pool::deposit,
        shielded_pool::withdraw,
        shielded_pool::add_supported_asset,
        shielded_pool::remove_supported_asset,
        shielded_pool::set_deposit_limits,
        shielded_pool::set_deposit_fee,
        shielded_pool::set_fee_collector,
        shielded_pool::emergency_withdraw,
        price_oracle::price,
        price_oracle::set_price,
        price_oracle::set_prices,
        price_oracle::set_price_source,
        price_oracle::set_staleness,
        governance::total_supply,
        governance::mint,
        governance::burn,
        interest_token::scaled_balance,
        interest_token::mint,
        interest_token::burn,
        interest_token::set_liquidity,
        reserve_data::config,
        reserve_data::set_config,
        reserve_data::set_state,
        reserve_data::set_user_data,
        addresses_provider::all,
        addresses_provider::set_lending_pool,
        addresses_provider::set_shielded_pool,
        addresses_provider::set_price_oracle
    ),
    components(
        schemas(
            Quantity,
            NonceChallenge,
            LoginRequest,
            AccessToken,
            users::ProfileResponse,
            IdentityPatch,
            ActivityRecord,
            NewActivity,
            transactions::ActivityListResponse,
            PositionRecord,
            PositionUpdate,
            assets::Asset,
            TransactionOutcome,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            auth::LogoutResponse,
            lending_pool::DepositRequest,
            lending_pool::WithdrawRequest,
            lending_pool::BorrowRequest,
            shielded_pool::DepositShieldedRequest,
            shielded_pool::WithdrawShieldedRequest,
            shielded_pool::AssetRequest,
            shielded_pool::DepositLimitsRequest,
            shielded_pool::DepositFeeRequest,
            shielded_pool::FeeCollectorRequest,
            shielded_pool::EmergencyWithdrawRequest,
            price_oracle::SetPriceRequest,
            price_oracle::SetPricesRequest,
            price_oracle::SetPriceSourceRequest,
            price_oracle::SetStalenessRequest,
            governance::MintRequest,
            governance::BurnRequest,
            interest_token::MintRequest,
            interest_token::BurnRequest,
            interest_token::SetLiquidityRequest,
            reserve_data::SetReserveConfigRequest,
            reserve_data::SetReserveStateRequest,
            reserve_data::SetUserReserveDataRequest,
            addresses_provider::SetAddressRequest
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Wallet signature login"),
        (name = "Users", description = "Profile of the signed-in wallet"),
        (name = "Transactions", description = "Client-reported activity history"),
        (name = "Positions", description = "Stored lending positions of the signed-in wallet"),
        (name = "Assets", description = "Supported asset catalogue"),
        (name = "LendingPool", description = "Collateral and debt positions"),
        (name = "ShieldedPool", description = "Private deposits and withdrawals"),
        (name = "PriceOracle", description = "Asset prices"),
        (name = "Governance", description = "VEILENDGOV token supply"),
        (name = "InterestToken", description = "Interest-bearing token"),
        (name = "ReserveData", description = "Reserve configuration and state"),
        (name = "AddressesProvider", description = "Protocol address registry")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for router-level tests.

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::auth::VerifiedIdentity;
    use crate::state::AppState;

    pub const CALLER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    pub fn bearer(state: &AppState) -> String {
        let verified = VerifiedIdentity {
            address: CALLER.to_string(),
            nonce: "1".to_string(),
        };
        let token = state.sessions.issue(&verified, Utc::now()).unwrap();
        format!("Bearer {}", token.access_token)
    }

    /// Send a request and return the status and parsed JSON body.
    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
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

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
