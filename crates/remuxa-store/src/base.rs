#![forbid(unsafe_code)]

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    entry::{Entry, StorageEstimate},
    error::StoreResult,
};

/// Contract for a named-blob cache store.
///
/// ## What this trait is about (normative)
///
/// A store maps names to immutable blobs and mutates them asynchronously:
/// - `create` installs fresh content, replacing anything already there,
/// - `set`/`append` update content that must already exist,
/// - `rename` moves an entry, replacing the target if present,
/// - `delete`/`clear` remove content and are idempotent.
///
/// ## What it is NOT about (normative)
///
/// - No path or key munging: names are opaque to the contract.
/// - No data-format knowledge: blobs are bytes; interpretation lives on
///   [`Entry`]'s conversion surface.
/// - No locking contract: implementations decide how mutations are
///   serialized (the bundled backend runs them through a FIFO mutex).
#[async_trait]
pub trait CacheStore: Clone + Send + Sync + 'static {
    /// Install fresh content under `name`, replacing any previous entry.
    async fn create(&self, name: &str, data: Bytes) -> StoreResult<()>;

    /// Replace the content of an existing entry.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// there is nothing under `name`.
    async fn set(&self, name: &str, data: Bytes) -> StoreResult<()>;

    /// Extend an existing entry with `data`.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// there is nothing under `name`.
    async fn append(&self, name: &str, data: Bytes) -> StoreResult<()>;

    /// Look up an entry. Absence is `Ok(None)`, not an error.
    async fn get(&self, name: &str) -> StoreResult<Option<Entry>>;

    /// Whether an entry exists under `name`.
    async fn has(&self, name: &str) -> StoreResult<bool>;

    /// Remove an entry if present. Removing a missing entry is a no-op.
    async fn delete(&self, name: &str) -> StoreResult<()>;

    /// Move the entry at `from` to `to`, replacing any entry at `to`.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// there is nothing under `from`.
    async fn rename(&self, from: &str, to: &str) -> StoreResult<()>;

    /// Names of all entries, sorted.
    async fn list(&self) -> StoreResult<Vec<String>>;

    /// Remove every entry.
    async fn clear(&self) -> StoreResult<()>;

    /// Current usage and capacity, as far as the backend can tell.
    async fn quota(&self) -> StoreResult<StorageEstimate>;
}
