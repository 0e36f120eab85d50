// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Catalogue of assets the client can supply or borrow.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Asset {
    pub id: u32,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Client icon name
    pub icon: &'static str,
    /// Supply APY in percent
    pub apy: f64,
}

pub const SUPPORTED_ASSETS: [Asset; 4] = [
    Asset {
        id: 1,
        name: "Ethereum",
        symbol: "ETH",
        icon: "logo-electron",
        apy: 4.5,
    },
    Asset {
        id: 2,
        name: "USDC",
        symbol: "USDC",
        icon: "cash-outline",
        apy: 8.2,
    },
    Asset {
        id: 3,
        name: "Starknet",
        symbol: "STRK",
        icon: "layers-outline",
        apy: 12.5,
    },
    Asset {
        id: 4,
        name: "Bitcoin",
        symbol: "WBTC",
        icon: "logo-bitcoin",
        apy: 3.8,
    },
];

#[utoipa::path(
    get,
    path = "/assets",
    tag = "Assets",
    responses(
        (status = 200, description = "Supported assets", body = Vec<Asset>)
    )
)]
pub async fn list_assets() -> Json<Vec<Asset>> {
    Json(SUPPORTED_ASSETS.to_vec())
}
