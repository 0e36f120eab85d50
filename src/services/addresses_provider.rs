// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use serde_json::json;

use super::contract::{named_args, ContractService, ReadOutcome, WriteOutcome};
use crate::chain::{ChainGateway, ContractKind};

/// Registry of the protocol's core contract addresses.
pub struct AddressesProviderService {
    contract: ContractService,
}

impl AddressesProviderService {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            contract: ContractService::new(ContractKind::AddressesProvider, gateway),
        }
    }

    pub async fn all_addresses(&self, contract: &str) -> ReadOutcome {
        self.contract.read(contract, "get_all_addresses", named_args([])).await
    }

    pub async fn set_lending_pool(&self, contract: &str, new_address: &str) -> WriteOutcome {
        self.set_address(contract, "set_lending_pool", new_address).await
    }

    pub async fn set_shielded_pool(&self, contract: &str, new_address: &str) -> WriteOutcome {
        self.set_address(contract, "set_shielded_pool", new_address).await
    }

    pub async fn set_price_oracle(&self, contract: &str, new_address: &str) -> WriteOutcome {
        self.set_address(contract, "set_price_oracle", new_address).await
    }

    async fn set_address(&self, contract: &str, entry_point: &str, new_address: &str) -> WriteOutcome {
        self.contract
            .write(contract, entry_point, named_args([("new_address", json!(new_address))]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter, DEV_ADDRESS};

    const PROVIDER: &str = "0x9999999999999999999999999999999999999999";

    #[tokio::test]
    async fn each_setter_hits_its_own_entry_point() {
        let submitter = MockSubmitter::new(Behaviour::Confirm { logs: Vec::new() });
        let service = AddressesProviderService::new(Arc::new(gateway(submitter.clone(), Some(credential()))));

        service.set_lending_pool(PROVIDER, DEV_ADDRESS).await;
        service.set_shielded_pool(PROVIDER, DEV_ADDRESS).await;
        service.set_price_oracle(PROVIDER, DEV_ADDRESS).await;

        let entry_points: Vec<_> = submitter
            .submitted
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.call.entry_point.clone())
            .collect();
        assert_eq!(entry_points, ["set_lending_pool", "set_shielded_pool", "set_price_oracle"]);
    }

    #[tokio::test]
    async fn setter_with_bad_address_is_an_encoding_failure() {
        let service = AddressesProviderService::new(Arc::new(gateway(
            MockSubmitter::new(Behaviour::Confirm { logs: Vec::new() }),
            Some(credential()),
        )));
        let outcome = service.set_price_oracle(PROVIDER, "0x12").await;
        assert_eq!(outcome.failure().unwrap().kind, "encoding_error");
    }
}
