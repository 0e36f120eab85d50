// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain services, one per contract kind.
//!
//! Each service shapes business parameters into the named arguments its
//! contract interface declares and hands them to the chain gateway. Writes
//! return a [`WriteOutcome`] and reads a [`ReadOutcome`]; neither ever
//! propagates an error to the HTTP layer.

pub mod addresses_provider;
mod contract;
pub mod governance;
pub mod interest_token;
pub mod lending_pool;
pub mod price_oracle;
pub mod reserve_data;
pub mod shielded_pool;

use std::sync::Arc;

use crate::chain::ChainGateway;

pub use addresses_provider::AddressesProviderService;
pub use contract::{ContractService, ReadOutcome, WriteFailure, WriteOutcome, NETWORK_UNREACHABLE_INFO};
pub use governance::GovernanceService;
pub use interest_token::InterestTokenService;
pub use lending_pool::LendingPoolService;
pub use price_oracle::PriceOracleService;
pub use reserve_data::ReserveDataService;
pub use shielded_pool::{ShieldedPoolService, ShieldedWithdrawal};

/// All domain services, sharing one gateway.
pub struct DomainServices {
    pub lending_pool: LendingPoolService,
    pub shielded_pool: ShieldedPoolService,
    pub price_oracle: PriceOracleService,
    pub governance: GovernanceService,
    pub interest_token: InterestTokenService,
    pub reserve_data: ReserveDataService,
    pub addresses_provider: AddressesProviderService,
}

impl DomainServices {
    pub fn new(gateway: Arc<ChainGateway>) -> Self {
        Self {
            lending_pool: LendingPoolService::new(Arc::clone(&gateway)),
            shielded_pool: ShieldedPoolService::new(Arc::clone(&gateway)),
            price_oracle: PriceOracleService::new(Arc::clone(&gateway)),
            governance: GovernanceService::new(Arc::clone(&gateway)),
            interest_token: InterestTokenService::new(Arc::clone(&gateway)),
            reserve_data: ReserveDataService::new(Arc::clone(&gateway)),
            addresses_provider: AddressesProviderService::new(gateway),
        }
    }
}
