#![forbid(unsafe_code)]

//! `remuxa-store`
//!
//! Named-blob cache store for the remuxa bundle.
//!
//! Provides the [`CacheStore`] contract (create/get/set/append/delete/rename
//! over named blobs, plus listing and a quota query) and an in-memory backend,
//! [`MemStore`]. Entries come back as [`Entry`], which carries the blob and its
//! conversion surface (text, JSON, byte stream).
//!
//! Mutations on a store are serialized through a [`remuxa_sync::Mutex`], so
//! multi-step updates from concurrent tasks cannot tear each other.

mod base;
mod entry;
mod error;
mod mem_store;

pub use base::CacheStore;
pub use entry::{Entry, StorageEstimate};
pub use error::{StoreError, StoreResult};
pub use mem_store::MemStore;
