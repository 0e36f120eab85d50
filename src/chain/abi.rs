// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract interface descriptors (JSON ABIs) and their on-disk store.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use alloy::json_abi::{Function, JsonAbi};
use lru::LruCache;

use super::error::ChainError;
use super::types::ContractKind;

/// A parsed interface descriptor for one contract kind.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    kind: ContractKind,
    abi: JsonAbi,
}

impl ContractDescriptor {
    pub fn new(kind: ContractKind, abi: JsonAbi) -> Self {
        Self { kind, abi }
    }

    /// Parse a descriptor from either a bare ABI array or an object with an
    /// `abi` field (the layout most build tools emit).
    pub fn from_json(kind: ContractKind, raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let abi_value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("abi") => {
                map.remove("abi").unwrap_or_default()
            }
            other => other,
        };
        let abi: JsonAbi = serde_json::from_value(abi_value)?;
        Ok(Self { kind, abi })
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// First declared overload of `name`.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abi.function(name).and_then(|overloads| overloads.first())
    }
}

/// Loads descriptors by file name from a directory and keeps them cached.
///
/// Descriptors are immutable while the process runs, so a cached entry is
/// never invalidated. `LruCache` is used as a capacity-capped map: one slot
/// per contract kind, so nothing is evicted in practice.
pub struct DescriptorStore {
    dir: PathBuf,
    cache: Mutex<LruCache<ContractKind, Arc<ContractDescriptor>>>,
}

impl DescriptorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(ContractKind::ALL.len()).unwrap_or(NonZeroUsize::MIN);
        Self {
            dir: dir.into(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the descriptor for `kind`, reading it from disk on first use.
    pub fn load(&self, kind: ContractKind) -> Result<Arc<ContractDescriptor>, ChainError> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(descriptor) = cache.get(&kind) {
                return Ok(Arc::clone(descriptor));
            }
        }

        let path = self.dir.join(kind.descriptor_file());
        let raw = std::fs::read_to_string(&path).map_err(|e| ChainError::DescriptorNotFound {
            kind,
            reason: format!("{}: {e}", path.display()),
        })?;
        let descriptor = ContractDescriptor::from_json(kind, &raw).map_err(|e| {
            ChainError::DescriptorNotFound {
                kind,
                reason: format!("{}: {e}", path.display()),
            }
        })?;
        let descriptor = Arc::new(descriptor);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(kind, Arc::clone(&descriptor));
        }
        tracing::debug!(%kind, path = %path.display(), "contract interface loaded");
        Ok(descriptor)
    }
}

#[cfg(test)]
pub(crate) fn shipped_descriptors() -> DescriptorStore {
    DescriptorStore::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("abis"))
}
