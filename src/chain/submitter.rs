// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network signing and submission capability.

use std::time::Duration;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::B256,
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest as RpcTransactionRequest,
};
use async_trait::async_trait;

use super::error::ChainError;
use super::signing::signer_for;
use super::types::{RawLog, RawReceipt, TransactionRequest};
use crate::config::AdminCredential;

/// Interval between receipt polls while waiting for inclusion.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Submits signed call transactions and waits for their receipts.
///
/// The gateway bounds `wait_for_receipt` with its own timeout, so
/// implementations may wait indefinitely.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Sign and broadcast one call transaction, returning its hash.
    async fn submit(
        &self,
        credential: &AdminCredential,
        request: &TransactionRequest,
    ) -> Result<B256, ChainError>;

    /// Wait until the transaction is included and return its receipt.
    async fn wait_for_receipt(
        &self,
        credential: &AdminCredential,
        hash: B256,
    ) -> Result<RawReceipt, ChainError>;
}

/// [`TransactionSubmitter`] backed by an alloy HTTP provider.
#[derive(Debug, Default, Clone)]
pub struct AlloySubmitter;

fn parse_node_url(credential: &AdminCredential) -> Result<url::Url, ChainError> {
    credential
        .node_url
        .parse()
        .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))
}

#[async_trait]
impl TransactionSubmitter for AlloySubmitter {
    async fn submit(
        &self,
        credential: &AdminCredential,
        request: &TransactionRequest,
    ) -> Result<B256, ChainError> {
        let signer = signer_for(credential)?;
        let url = parse_node_url(credential)?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        let tx = RpcTransactionRequest::default()
            .with_from(credential.wallet_address)
            .with_to(request.target)
            .with_input(request.call.calldata.clone());

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Submission(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        credential: &AdminCredential,
        hash: B256,
    ) -> Result<RawReceipt, ChainError> {
        let url = parse_node_url(credential)?;
        let provider = ProviderBuilder::new().connect_http(url);

        loop {
            let receipt = provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| ChainError::Confirmation(format!("Failed to get receipt: {e}")))?;

            if let Some(receipt) = receipt {
                let logs = receipt
                    .inner
                    .logs()
                    .iter()
                    .map(|log| RawLog {
                        address: log.inner.address,
                        topics: log.inner.data.topics().to_vec(),
                        data: log.inner.data.data.clone(),
                    })
                    .collect();

                return Ok(RawReceipt {
                    transaction_hash: receipt.transaction_hash,
                    block_hash: receipt.block_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used as u64,
                    status: receipt.status(),
                    logs,
                });
            }

            tracing::trace!(%hash, "receipt not yet available");
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
