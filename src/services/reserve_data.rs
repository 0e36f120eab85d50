// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reserve configuration, reserve state and per-user reserve data.
//!
//! Configuration and state updates take free-form field maps; the asset is
//! merged in before encoding so that the map only has to carry the
//! remaining fields.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

pub struct ReserveDataService {
    contract: ContractService,
}

impl ReserveDataService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::ReserveData, gateway),
        }
    }

    pub async fn reserve_config(&self, contract: &str, asset: &str) -> ReadOutcome {
        self.contract
            .read(contract, "get_reserve_config", named_args([("asset", json!(asset))]))
            .await
    }

    pub async fn set_reserve_config(&self, contract: &str, asset: &str, config: Map<String, Value>) -> WriteOutcome {
        self.contract
            .write(contract, "set_reserve_config", with_asset(asset, config))
            .await
    }

    pub async fn set_reserve_state(&self, contract: &str, asset: &str, state: Map<String, Value>) -> WriteOutcome {
        self.contract
            .write(contract, "set_reserve_state", with_asset(asset, state))
            .await
    }

    /// Only the three user-reserve fields are taken from `data`.
    pub async fn set_user_reserve_data(
        &self,
        contract: &str,
        user: &str,
        asset: &str,
        data: Map<String, Value>,
    ) -> WriteOutcome {
        let field = |name: &str| data.get(name).cloned().unwrap_or(Value::Null);
        let args = named_args([
            ("user", json!(user)),
            ("asset", json!(asset)),
            ("scaled_a_token_balance", field("scaled_a_token_balance")),
            ("scaled_variable_debt", field("scaled_variable_debt")),
            ("is_using_as_collateral", field("is_using_as_collateral")),
        ]);
        self.contract.write(contract, "set_user_reserve_data", args).await
    }
}

fn with_asset(asset: &str, mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.insert("asset".to_string(), json!(asset));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter, DEV_ADDRESS};

    const RESERVE: &str = "0x8888888888888888888888888888888888888888";
    const ASSET: &str = "0x2222222222222222222222222222222222222222";

    fn service(behaviour: Behaviour) -> (ReserveDataService, Arc<MockSubmitter>) {
        let submitter = MockSubmitter::new(behaviour);
        let gateway = Arc::new(gateway(submitter.clone(), Some(credential())));
        (ReserveDataService::new(gateway), submitter)
    }

    fn config() -> Map<String, Value> {
        json!({
            "ltv": 7500,
            "liquidation_threshold": 8000,
            "liquidation_bonus": 10500,
            "reserve_factor": 1000,
            "decimals": 18,
            "is_active": true,
            "is_frozen": false,
            "borrowing_enabled": true
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn config_is_merged_with_the_asset() {
        let (service, submitter) = service(Behaviour::Confirm { logs: Vec::new() });
        assert!(service.set_reserve_config(RESERVE, ASSET, config()).await.is_confirmed());
        assert_eq!(
            submitter.submitted.lock().unwrap()[0].call.entry_point,
            "set_reserve_config"
        );
    }

    #[tokio::test]
    async fn incomplete_state_is_an_encoding_failure() {
        let (service, submitter) = service(Behaviour::Confirm { logs: Vec::new() });
        let state = json!({ "liquidity_index": "1" }).as_object().cloned().unwrap();

        let outcome = service.set_reserve_state(RESERVE, ASSET, state).await;
        assert_eq!(outcome.failure().unwrap().kind, "encoding_error");
        assert!(submitter.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_data_submission_failure_is_returned() {
        let (service, _) = service(Behaviour::RejectSubmission);
        let data = json!({
            "scaled_a_token_balance": "100",
            "scaled_variable_debt": 0,
            "is_using_as_collateral": true,
            "ignored": "extra"
        })
        .as_object()
        .cloned()
        .unwrap();

        let outcome = service.set_user_reserve_data(RESERVE, DEV_ADDRESS, ASSET, data).await;
        assert_eq!(outcome.failure().unwrap().kind, "submission_failed");
    }
}
