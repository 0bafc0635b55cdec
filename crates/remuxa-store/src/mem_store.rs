#![forbid(unsafe_code)]

//! In-memory cache store for ephemeral content.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use parking_lot::RwLock;
use remuxa_sync::Mutex;
use tracing::trace;

use crate::{
    base::CacheStore,
    entry::{Entry, StorageEstimate},
    error::{StoreError, StoreResult},
};

/// In-memory [`CacheStore`] implementation.
///
/// Entries live in a `HashMap` behind an `RwLock`; lookups read the map
/// directly. Every mutation runs through a [`remuxa_sync::Mutex`], so a
/// multi-step update (`append` reads, merges, writes back) is atomic with
/// respect to every other mutation, and mutations land in FIFO order.
///
/// Nothing is persisted; `quota` reports current usage with no limit.
#[derive(Clone, Default)]
pub struct MemStore {
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
    mutations: Mutex,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemStore")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemStore {
    async fn create(&self, name: &str, data: Bytes) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                trace!(name, len = data.len(), "MemStore: create");
                self.entries.write().insert(name.to_string(), data);
                Ok(())
            })
            .await
    }

    async fn set(&self, name: &str, data: Bytes) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                let mut entries = self.entries.write();
                let Some(slot) = entries.get_mut(name) else {
                    return Err(StoreError::not_found(name));
                };
                *slot = data;
                Ok(())
            })
            .await
    }

    async fn append(&self, name: &str, data: Bytes) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                // Read-modify-write; the mutation mutex keeps concurrent
                // appends from losing each other's suffix.
                let existing = self.entries.read().get(name).cloned();
                let Some(existing) = existing else {
                    return Err(StoreError::not_found(name));
                };

                let mut merged = BytesMut::with_capacity(existing.len() + data.len());
                merged.extend_from_slice(&existing);
                merged.extend_from_slice(&data);
                self.entries.write().insert(name.to_string(), merged.freeze());
                trace!(name, added = data.len(), "MemStore: append");
                Ok(())
            })
            .await
    }

    async fn get(&self, name: &str) -> StoreResult<Option<Entry>> {
        let data = self.entries.read().get(name).cloned();
        Ok(data.map(|data| Entry::new(name, data)))
    }

    async fn has(&self, name: &str) -> StoreResult<bool> {
        Ok(self.entries.read().contains_key(name))
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                if self.entries.write().remove(name).is_some() {
                    trace!(name, "MemStore: delete");
                }
                Ok(())
            })
            .await
    }

    async fn rename(&self, from: &str, to: &str) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                let mut entries = self.entries.write();
                let Some(data) = entries.remove(from) else {
                    return Err(StoreError::not_found(from));
                };
                entries.insert(to.to_string(), data);
                trace!(from, to, "MemStore: rename");
                Ok(())
            })
            .await
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn clear(&self) -> StoreResult<()> {
        self.mutations
            .run_exclusive(async {
                let removed = {
                    let mut entries = self.entries.write();
                    let removed = entries.len();
                    entries.clear();
                    removed
                };
                trace!(removed, "MemStore: clear");
                Ok(())
            })
            .await
    }

    async fn quota(&self) -> StoreResult<StorageEstimate> {
        let usage = self
            .entries
            .read()
            .values()
            .map(|data| data.len() as u64)
            .sum();
        Ok(StorageEstimate { usage, quota: None })
    }
}
