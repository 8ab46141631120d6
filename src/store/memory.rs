//! In-process record store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use super::{Getter, StoreError};
use crate::types::Address;

/// Records held in a hash map, with optional latency and injected faults.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Address, Vec<u8>>>,
    faults: RwLock<HashSet<Address>>,
    latency: Option<Duration>,
    gets: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `get` sleeps for `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn put(&self, address: Address, record: Vec<u8>) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, record);
    }

    pub fn remove(&self, address: &Address) -> Option<Vec<u8>> {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(address)
    }

    /// Make every `get` of `address` fail as unavailable, whether or not a record exists.
    pub fn fail_on(&self, address: Address) {
        self.faults
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address);
    }

    pub fn clear_faults(&self) {
        self.faults
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get` calls served so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Getter for MemoryStore {
    async fn get(&self, address: &Address) -> Result<Vec<u8>, StoreError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self
            .faults
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(address)
        {
            return Err(StoreError::Unavailable(format!("injected fault at {}", address)));
        }
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(address)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
