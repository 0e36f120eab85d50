// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The chain gateway: descriptor resolution, contract binding, calldata
//! compilation and the admin-signed write pipeline.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest as RpcTransactionRequest,
};
use serde_json::{Map, Value};

use super::abi::{ContractDescriptor, DescriptorStore};
use super::encoding::{self, compile_arguments};
use super::error::{ChainError, EncodingError};
use super::events::{AbiEventDecoder, EventDecoder};
use super::submitter::{AlloySubmitter, TransactionSubmitter};
use super::types::{ContractKind, EncodedCall, TransactionOutcome, TransactionRequest};
use crate::config::{AdminCredential, AppConfig};

const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// A contract handle, live or descriptor-only.
pub enum ContractBinding {
    /// Bound to an RPC endpoint; reads go to the network.
    Live(LiveContract),
    /// Interface known but no usable endpoint.
    DescriptorOnly {
        descriptor: Arc<ContractDescriptor>,
        address: String,
    },
}

impl ContractBinding {
    pub fn descriptor(&self) -> &Arc<ContractDescriptor> {
        match self {
            ContractBinding::Live(live) => &live.descriptor,
            ContractBinding::DescriptorOnly { descriptor, .. } => descriptor,
        }
    }
}

/// A contract reachable through a read-only provider.
pub struct LiveContract {
    descriptor: Arc<ContractDescriptor>,
    address: Address,
    provider: DynProvider,
}

impl LiveContract {
    /// Execute a read-only call and decode its return data.
    pub async fn call(&self, entry_point: &str, args: &Map<String, Value>) -> Result<Value, ChainError> {
        let encoded = compile_arguments(&self.descriptor, entry_point, args)?;
        let function = self
            .descriptor
            .function(entry_point)
            .ok_or_else(|| EncodingError::UnknownEntryPoint {
                entry_point: entry_point.to_string(),
            })?;

        let tx = RpcTransactionRequest::default()
            .with_to(self.address)
            .with_input(encoded.calldata);
        let output = self
            .provider
            .call(tx)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))?;

        Ok(encoding::decode_output(function, &output)?)
    }
}

/// Entry point for every on-chain interaction.
pub struct ChainGateway {
    descriptors: DescriptorStore,
    rpc_url: Option<String>,
    admin: Option<AdminCredential>,
    submitter: Arc<dyn TransactionSubmitter>,
    decoder: Arc<dyn EventDecoder>,
    submission_timeout: Duration,
    confirmation_timeout: Duration,
    submission_locks: Mutex<HashMap<Address, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChainGateway {
    pub fn new(
        descriptors: DescriptorStore,
        rpc_url: Option<String>,
        admin: Option<AdminCredential>,
        submitter: Arc<dyn TransactionSubmitter>,
    ) -> Self {
        Self {
            descriptors,
            rpc_url,
            admin,
            submitter,
            decoder: Arc::new(AbiEventDecoder),
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            submission_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Gateway wired to the network through alloy.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DescriptorStore::new(&config.abi_dir),
            config.rpc_url.clone(),
            config.admin.clone(),
            Arc::new(AlloySubmitter),
        )
        .with_submission_timeout(config.submission_timeout)
        .with_confirmation_timeout(config.confirmation_timeout)
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn EventDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Whether contract writes can be signed.
    pub fn has_admin_credential(&self) -> bool {
        self.admin.is_some()
    }

    /// Load (and cache) the interface descriptor for `kind`.
    pub fn resolve_interface(&self, kind: ContractKind) -> Result<Arc<ContractDescriptor>, ChainError> {
        self.descriptors.load(kind).inspect_err(|e| {
            tracing::warn!(%kind, error = %e, "contract interface unavailable");
        })
    }

    /// Bind a handle to `address`.
    ///
    /// Returns `None` only when the descriptor cannot be resolved. Missing or
    /// unusable RPC configuration yields [`ContractBinding::DescriptorOnly`].
    pub fn bind_contract(&self, kind: ContractKind, address: &str) -> Option<ContractBinding> {
        let descriptor = self.resolve_interface(kind).ok()?;
        let descriptor_only = |descriptor| ContractBinding::DescriptorOnly {
            descriptor,
            address: address.to_string(),
        };

        let Some(rpc_url) = self.rpc_url.as_deref() else {
            return Some(descriptor_only(descriptor));
        };

        let contract_address = match Address::from_str(address.trim()) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(%kind, %address, error = %e, "cannot bind contract: invalid address");
                return Some(descriptor_only(descriptor));
            }
        };
        let url = match url::Url::parse(rpc_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "cannot bind contract: invalid RPC URL");
                return Some(descriptor_only(descriptor));
            }
        };

        let provider = ProviderBuilder::new().connect_http(url).erased();
        Some(ContractBinding::Live(LiveContract {
            descriptor,
            address: contract_address,
            provider,
        }))
    }

    pub fn compile_arguments(
        &self,
        descriptor: &ContractDescriptor,
        entry_point: &str,
        args: &Map<String, Value>,
    ) -> Result<EncodedCall, EncodingError> {
        compile_arguments(descriptor, entry_point, args)
    }

    /// Sign, submit and confirm one call transaction with the admin credential.
    ///
    /// Submissions from the same signing address are serialised so that
    /// account nonces are assigned in order. A submission holds that lock
    /// for at most the submission timeout; the confirmation wait runs
    /// outside it.
    pub async fn execute(
        &self,
        request: TransactionRequest,
        descriptor: &ContractDescriptor,
    ) -> Result<TransactionOutcome, ChainError> {
        let credential = self.admin.as_ref().ok_or(ChainError::MissingCredential)?;

        let lock = self.submission_lock(credential.wallet_address);
        let hash = {
            let _guard = lock.lock().await;
            tokio::time::timeout(self.submission_timeout, self.submitter.submit(credential, &request))
                .await
                .map_err(|_| ChainError::SubmissionTimeout {
                    after: self.submission_timeout,
                })??
        };
        tracing::info!(
            kind = %descriptor.kind(),
            entry_point = %request.call.entry_point,
            target = %request.target,
            %hash,
            "transaction submitted"
        );

        let receipt = tokio::time::timeout(
            self.confirmation_timeout,
            self.submitter.wait_for_receipt(credential, hash),
        )
        .await
        .map_err(|_| ChainError::ConfirmationTimeout {
            hash,
            after: self.confirmation_timeout,
        })??;

        if !receipt.status {
            return Err(ChainError::Confirmation(format!("transaction {hash} reverted")));
        }

        let events = self.decoder.decode_receipt(descriptor, &receipt.logs);
        tracing::info!(%hash, block = ?receipt.block_number, "transaction confirmed");

        Ok(TransactionOutcome {
            transaction_hash: hash,
            receipt,
            events,
        })
    }

    fn submission_lock(&self, signer: Address) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .submission_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(signer).or_default())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::chain::events::DecodeFailure;
    use crate::chain::types::{DecodedEvent, RawLog, TransactionEvents};
    use alloy::primitives::Bytes;

    /// A decoder whose pass always fails.
    struct BrokenDecoder;

    impl EventDecoder for BrokenDecoder {
        fn decode(&self, _: &ContractDescriptor, _: &RawLog) -> Result<DecodedEvent, DecodeFailure> {
            Err(DecodeFailure::Anonymous)
        }

        fn decode_all(
            &self,
            descriptor: &ContractDescriptor,
            _: &[RawLog],
        ) -> Result<Vec<DecodedEvent>, DecodeFailure> {
            Err(DecodeFailure::NoEventsDeclared(descriptor.kind().to_string()))
        }
    }

    fn request(descriptor: &ContractDescriptor) -> TransactionRequest {
        let mut args = Map::new();
        args.insert("recipient".into(), Value::String(DEV_ADDRESS.into()));
        args.insert("amount".into(), Value::String("10".into()));
        TransactionRequest {
            target: Address::repeat_byte(0x42),
            call: compile_arguments(descriptor, "mint", &args).unwrap(),
        }
    }

    #[test]
    fn bind_without_rpc_is_descriptor_only() {
        let gateway = gateway(MockSubmitter::new(Behaviour::Hang), None);
        let binding = gateway
            .bind_contract(ContractKind::Governance, "0x42")
            .unwrap();
        assert!(matches!(binding, ContractBinding::DescriptorOnly { ref address, .. } if address == "0x42"));
    }

    #[test]
    fn bind_with_missing_descriptor_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = ChainGateway::new(
            DescriptorStore::new(dir.path()),
            Some("http://localhost:8545".into()),
            None,
            MockSubmitter::new(Behaviour::Hang),
        );
        assert!(gateway.bind_contract(ContractKind::Governance, DEV_ADDRESS).is_none());
    }

    #[tokio::test]
    async fn bind_with_rpc_is_live() {
        let gateway = ChainGateway::new(
            crate::chain::abi::shipped_descriptors(),
            Some("http://127.0.0.1:8545".into()),
            None,
            MockSubmitter::new(Behaviour::Hang),
        );
        let binding = gateway.bind_contract(ContractKind::Governance, DEV_ADDRESS).unwrap();
        assert!(matches!(binding, ContractBinding::Live(_)));

        let invalid = gateway.bind_contract(ContractKind::Governance, "nope").unwrap();
        assert!(matches!(invalid, ContractBinding::DescriptorOnly { .. }));
    }

    #[tokio::test]
    async fn execute_requires_credential() {
        let submitter = MockSubmitter::new(Behaviour::Confirm { logs: Vec::new() });
        let gateway = gateway(submitter.clone(), None);
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let err = gateway.execute(request(&descriptor), &descriptor).await.unwrap_err();
        assert!(matches!(err, ChainError::MissingCredential));
        assert!(submitter.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn execute_returns_receipt_and_events() {
        let submitter = MockSubmitter::new(Behaviour::Confirm {
            logs: vec![crate::chain::types::RawLog {
                address: Address::repeat_byte(0x42),
                topics: vec![alloy::primitives::B256::repeat_byte(0x99)],
                data: Bytes::new(),
            }],
        });
        let gateway = gateway(submitter.clone(), Some(credential()));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let outcome = gateway.execute(request(&descriptor), &descriptor).await.unwrap();
        assert_eq!(outcome.receipt.transaction_hash, outcome.transaction_hash);
        assert_eq!(outcome.events, TransactionEvents::Decoded(Vec::new()));

        let submitted = submitter.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].call.entry_point, "mint");
    }

    #[tokio::test]
    async fn failed_decoding_returns_raw_logs() {
        let log = RawLog {
            address: Address::repeat_byte(0x42),
            topics: vec![alloy::primitives::B256::repeat_byte(0x99)],
            data: Bytes::from_static(&[1, 2, 3]),
        };
        let submitter = MockSubmitter::new(Behaviour::Confirm { logs: vec![log.clone()] });
        let gateway = gateway(submitter, Some(credential())).with_decoder(Arc::new(BrokenDecoder));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let outcome = gateway.execute(request(&descriptor), &descriptor).await.unwrap();
        assert_eq!(outcome.events, TransactionEvents::Raw(vec![log]));
        assert!(outcome.receipt.status);
    }

    #[tokio::test]
    async fn stalled_submission_releases_the_signer() {
        let submitter = MockSubmitter::new(Behaviour::StallFirstSubmission);
        let gateway = gateway(submitter.clone(), Some(credential()))
            .with_submission_timeout(Duration::from_millis(20));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let err = gateway.execute(request(&descriptor), &descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::SubmissionTimeout { after } if after == Duration::from_millis(20)
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::GATEWAY_TIMEOUT);

        // The next write for the same signer is not blocked behind the stalled one
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            gateway.execute(request(&descriptor), &descriptor),
        )
        .await
        .expect("second submission waited on the first")
        .unwrap();
        assert!(outcome.receipt.status);
        assert_eq!(submitter.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn confirmation_wait_is_bounded() {
        let gateway = gateway(MockSubmitter::new(Behaviour::Hang), Some(credential()))
            .with_confirmation_timeout(Duration::from_millis(20));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let err = gateway.execute(request(&descriptor), &descriptor).await.unwrap_err();
        assert!(matches!(err, ChainError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn reverted_transactions_fail_confirmation() {
        let gateway = gateway(MockSubmitter::new(Behaviour::Revert), Some(credential()));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let err = gateway.execute(request(&descriptor), &descriptor).await.unwrap_err();
        assert_eq!(err.kind(), "confirmation_failed");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn submissions_are_serialised_per_signer() {
        let submitter = MockSubmitter::new(Behaviour::Confirm { logs: Vec::new() });
        let gateway = Arc::new(gateway(submitter.clone(), Some(credential())));
        let descriptor = gateway.resolve_interface(ContractKind::Governance).unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let gateway = Arc::clone(&gateway);
                let descriptor = Arc::clone(&descriptor);
                tokio::spawn(async move {
                    gateway.execute(request(&descriptor), &descriptor).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(submitter.submitted.lock().unwrap().len(), 8);
        assert_eq!(submitter.max_in_flight.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
