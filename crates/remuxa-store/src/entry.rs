#![forbid(unsafe_code)]

use std::io::Cursor;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;

use crate::error::StoreResult;

/// A named blob read out of a [`CacheStore`](crate::CacheStore).
///
/// The payload is immutable; writing back goes through the store's mutation
/// operations. Conversions mirror what downstream consumers need from a cached
/// blob: raw bytes, text, JSON, or a chunked byte stream.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    data: Bytes,
}

impl Entry {
    pub(crate) fn new<S: Into<String>>(name: S, data: Bytes) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Decode the payload as UTF-8 text.
    pub fn text(&self) -> StoreResult<String> {
        Ok(String::from_utf8(self.data.to_vec())?)
    }

    /// Deserialize the payload as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_slice(&self.data)?)
    }

    /// Consume the entry as a chunked byte stream.
    pub fn stream(self) -> ReaderStream<Cursor<Bytes>> {
        ReaderStream::new(Cursor::new(self.data))
    }
}

/// Result of a [`quota`](crate::CacheStore::quota) query.
///
/// `quota: None` means the backend imposes no limit (or cannot report one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageEstimate {
    /// Bytes currently held by the store.
    pub usage: u64,
    /// Capacity limit, if the backend has one.
    pub quota: Option<u64>,
}
