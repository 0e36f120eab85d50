// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Price oracle reads and administrative price updates.

use std::sync::Arc;

use serde_json::{json, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

pub struct PriceOracleService {
    contract: ContractService,
}

impl PriceOracleService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::PriceOracle, gateway),
        }
    }

    pub async fn price(&self, contract: &str, asset: &str) -> ReadOutcome {
        self.contract
            .read(contract, "get_price", named_args([("asset", json!(asset))]))
            .await
    }

    pub async fn set_price(&self, contract: &str, asset: &str, price: Value) -> WriteOutcome {
        let args = named_args([("asset", json!(asset)), ("price", price)]);
        self.contract.write(contract, "set_price", args).await
    }

    /// Batch update; `assets` and `prices` are matched by position.
    pub async fn set_prices(&self, contract: &str, assets: Vec<String>, prices: Vec<Value>) -> WriteOutcome {
        let args = named_args([("assets", json!(assets)), ("prices", Value::Array(prices))]);
        self.contract.write(contract, "set_prices", args).await
    }

    pub async fn set_price_source(&self, contract: &str, asset: &str, source: &str) -> WriteOutcome {
        let args = named_args([("asset", json!(asset)), ("source", json!(source))]);
        self.contract.write(contract, "set_price_source", args).await
    }

    pub async fn set_staleness_threshold(&self, contract: &str, new_threshold: Value) -> WriteOutcome {
        self.contract
            .write(
                contract,
                "set_staleness_threshold",
                named_args([("new_threshold", new_threshold)]),
            )
            .await
    }
}
