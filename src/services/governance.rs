// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! VEILENDGOV governance token supply management.

use std::sync::Arc;

use serde_json::{json, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

pub struct GovernanceService {
    contract: ContractService,
}

impl GovernanceService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::Governance, gateway),
        }
    }

    pub async fn total_supply(&self, contract: &str) -> ReadOutcome {
        self.contract.read(contract, "totalSupply", named_args([])).await
    }

    pub async fn mint(&self, contract: &str, to: &str, amount: Value) -> WriteOutcome {
        let args = named_args([("recipient", json!(to)), ("amount", amount)]);
        self.contract.write(contract, "mint", args).await
    }

    pub async fn burn(&self, contract: &str, from: &str, amount: Value) -> WriteOutcome {
        let args = named_args([("account", json!(from)), ("amount", amount)]);
        self.contract.write(contract, "burn", args).await
    }
}
