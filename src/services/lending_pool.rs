// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lending pool: collateral deposits, withdrawals, borrows and repayments.
//!
//! When the beneficiary (`on_behalf_of` / `to`) is omitted it defaults to the
//! pool contract itself.

use std::sync::Arc;

use serde_json::{json, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

pub struct LendingPoolService {
    contract: ContractService,
}

impl LendingPoolService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::LendingPool, gateway),
        }
    }

    /// Collateral, debt and health factor for `user`.
    pub async fn user_account_data(&self, contract: &str, user: &str) -> ReadOutcome {
        self.contract
            .read(contract, "get_user_account_data", named_args([("user", json!(user))]))
            .await
    }

    pub async fn deposit(
        &self,
        contract: &str,
        asset: &str,
        amount: Value,
        on_behalf_of: Option<&str>,
    ) -> WriteOutcome {
        let args = named_args([
            ("asset", json!(asset)),
            ("amount", amount),
            ("on_behalf_of", json!(on_behalf_of.unwrap_or(contract))),
        ]);
        self.contract.write(contract, "deposit", args).await
    }

    pub async fn withdraw(&self, contract: &str, asset: &str, amount: Value, to: Option<&str>) -> WriteOutcome {
        let args = named_args([
            ("asset", json!(asset)),
            ("amount", amount),
            ("to", json!(to.unwrap_or(contract))),
        ]);
        self.contract.write(contract, "withdraw", args).await
    }

    pub async fn borrow(
        &self,
        contract: &str,
        asset: &str,
        amount: Value,
        interest_rate_mode: Value,
        on_behalf_of: Option<&str>,
    ) -> WriteOutcome {
        let args = named_args([
            ("asset", json!(asset)),
            ("amount", amount),
            ("interest_rate_mode", interest_rate_mode),
            ("on_behalf_of", json!(on_behalf_of.unwrap_or(contract))),
        ]);
        self.contract.write(contract, "borrow", args).await
    }

    pub async fn repay(
        &self,
        contract: &str,
        asset: &str,
        amount: Value,
        interest_rate_mode: Value,
        on_behalf_of: Option<&str>,
    ) -> WriteOutcome {
        let args = named_args([
            ("asset", json!(asset)),
            ("amount", amount),
            ("interest_rate_mode", interest_rate_mode),
            ("on_behalf_of", json!(on_behalf_of.unwrap_or(contract))),
        ]);
        self.contract.write(contract, "repay", args).await
    }
}
