// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shielded pool: commitment deposits, nullifier-based withdrawals and the
//! pool's administrative settings.

use std::sync::Arc;

use serde_json::{json, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

/// Arguments of a shielded withdrawal.
#[derive(Debug, Clone)]
pub struct ShieldedWithdrawal {
    pub nullifier: String,
    pub recipient: String,
    pub asset: String,
    pub amount: Value,
    /// Sibling hashes from leaf to root
    pub merkle_proof: Vec<Value>,
    /// 0 = left, 1 = right, one per proof element
    pub path_indices: Vec<Value>,
}

pub struct ShieldedPoolService {
    contract: ContractService,
}

impl ShieldedPoolService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::ShieldedPool, gateway),
        }
    }

    pub async fn commitment(&self, contract: &str, commitment: &str) -> ReadOutcome {
        self.contract
            .read(contract, "get_commitment", named_args([("commitment", json!(commitment))]))
            .await
    }

    pub async fn is_nullifier_used(&self, contract: &str, nullifier: &str) -> ReadOutcome {
        self.contract
            .read(contract, "is_nullifier_used", named_args([("nullifier", json!(nullifier))]))
            .await
    }

    pub async fn merkle_root(&self, contract: &str) -> ReadOutcome {
        self.contract.read(contract, "get_merkle_root", named_args([])).await
    }

    pub async fn deposit(&self, contract: &str, commitment: &str, asset: &str, amount: Value) -> WriteOutcome {
        let args = named_args([
            ("commitment", json!(commitment)),
            ("asset", json!(asset)),
            ("amount", amount),
        ]);
        self.contract.write(contract, "deposit_shielded", args).await
    }

    pub async fn withdraw(&self, contract: &str, withdrawal: ShieldedWithdrawal) -> WriteOutcome {
        let args = named_args([
            ("nullifier", json!(withdrawal.nullifier)),
            ("recipient", json!(withdrawal.recipient)),
            ("asset", json!(withdrawal.asset)),
            ("amount", withdrawal.amount),
            ("merkle_proof", Value::Array(withdrawal.merkle_proof)),
            ("path_indices", Value::Array(withdrawal.path_indices)),
        ]);
        self.contract.write(contract, "withdraw_shielded", args).await
    }

    pub async fn add_supported_asset(&self, contract: &str, asset: &str) -> WriteOutcome {
        self.contract
            .write(contract, "add_supported_asset", named_args([("asset", json!(asset))]))
            .await
    }

    pub async fn remove_supported_asset(&self, contract: &str, asset: &str) -> WriteOutcome {
        self.contract
            .write(contract, "remove_supported_asset", named_args([("asset", json!(asset))]))
            .await
    }

    pub async fn set_deposit_limits(&self, contract: &str, min_amount: Value, max_amount: Value) -> WriteOutcome {
        let args = named_args([("min_amount", min_amount), ("max_amount", max_amount)]);
        self.contract.write(contract, "set_deposit_limits", args).await
    }

    pub async fn set_deposit_fee(&self, contract: &str, fee_basis_points: Value) -> WriteOutcome {
        self.contract
            .write(
                contract,
                "set_deposit_fee",
                named_args([("fee_basis_points", fee_basis_points)]),
            )
            .await
    }

    pub async fn set_fee_collector(&self, contract: &str, new_collector: &str) -> WriteOutcome {
        self.contract
            .write(
                contract,
                "set_fee_collector",
                named_args([("new_collector", json!(new_collector))]),
            )
            .await
    }

    pub async fn emergency_withdraw(
        &self,
        contract: &str,
        asset: &str,
        recipient: &str,
        amount: Value,
    ) -> WriteOutcome {
        let args = named_args([
            ("asset", json!(asset)),
            ("recipient", json!(recipient)),
            ("amount", amount),
        ]);
        self.contract.write(contract, "emergency_withdraw", args).await
    }
}
