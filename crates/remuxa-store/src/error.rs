#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used by `remuxa-store`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by cache stores.
///
/// Notes:
/// - A missing entry is only an error for operations that need existing
///   content (`set`, `append`, `rename`). Lookups report absence through
///   `Option`/`bool` instead, and `delete` is idempotent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry named `{name}`")]
    NotFound { name: String },

    #[error("entry is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }
}
