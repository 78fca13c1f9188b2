//! In-memory state backend for testing and light deployments

use async_trait::async_trait;
use dashmap::DashMap;
use smelter_core::{SmelterResult, StateAddress, StateBackend, StateEntry};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// In-memory state backend backed by a concurrent map.
///
/// Inserts cannot fail, so a write request always lands in full.
pub struct MemoryStateBackend {
    data: DashMap<StateAddress, Vec<u8>>,
}

impl MemoryStateBackend {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Build a backend pre-seeded with entries
    pub fn with_entries(entries: Vec<StateEntry>) -> Self {
        let backend = Self::new();
        for entry in entries {
            backend.data.insert(entry.address, entry.data);
        }
        backend
    }

    /// Raw value currently stored at an address, if any
    pub fn value_at(&self, address: &StateAddress) -> Option<Vec<u8>> {
        self.data.get(address).map(|v| v.value().clone())
    }

    /// Number of populated addresses
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStateBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateBackend for MemoryStateBackend {
    async fn read(
        &self,
        addresses: &[StateAddress],
        _timeout: Duration,
    ) -> SmelterResult<Vec<StateEntry>> {
        let entries = addresses
            .iter()
            .filter_map(|address| {
                self.data
                    .get(address)
                    .map(|v| StateEntry::new(address.clone(), v.value().clone()))
            })
            .collect();
        Ok(entries)
    }

    async fn write(
        &self,
        entries: BTreeMap<StateAddress, Vec<u8>>,
        _timeout: Duration,
    ) -> SmelterResult<()> {
        for (address, data) in entries {
            self.data.insert(address, data);
        }
        Ok(())
    }
}

/// Thread-safe shared backend
pub type SharedMemoryBackend = Arc<MemoryStateBackend>;

/// Create a shared in-memory backend
pub fn create_memory_backend() -> SharedMemoryBackend {
    Arc::new(MemoryStateBackend::new())
}
