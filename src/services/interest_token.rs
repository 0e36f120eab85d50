// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Interest-bearing token: scaled balances, mint/burn and the liquidity
//! index.

use std::sync::Arc;

use serde_json::{json, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

pub struct InterestTokenService {
    contract: ContractService,
}

impl InterestTokenService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::InterestToken, gateway),
        }
    }

    pub async fn scaled_balance(&self, contract: &str, user: &str) -> ReadOutcome {
        self.contract
            .read(contract, "scaled_balance_of", named_args([("user", json!(user))]))
            .await
    }

    pub async fn mint(&self, contract: &str, to: &str, amount: Value) -> WriteOutcome {
        let args = named_args([("on_behalf_of", json!(to)), ("amount", amount)]);
        self.contract.write(contract, "_mint", args).await
    }

    pub async fn burn(&self, contract: &str, from: &str, amount: Value) -> WriteOutcome {
        let args = named_args([("from", json!(from)), ("amount", amount)]);
        self.contract.write(contract, "_burn", args).await
    }

    pub async fn set_liquidity_index(&self, contract: &str, new_index: Value) -> WriteOutcome {
        self.contract
            .write(contract, "set_liquidity_index", named_args([("new_index", new_index)]))
            .await
    }
}
