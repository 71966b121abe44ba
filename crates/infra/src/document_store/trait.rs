use thiserror::Error;

use catalog_core::{Document, Record};

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store operation error.
///
/// These are **infrastructure errors**. The message carries the backend's
/// own text so callers can surface it verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Async CRUD over a single collection.
///
/// Identifiers are generated by the store on `insert`. `replace` and
/// `delete` return `None` when the id does not resolve; they never create.
#[async_trait::async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Persist a new document under a freshly generated id.
    async fn insert(&self, data: T) -> StoreResult<Record<T>>;

    async fn find_by_id(&self, id: T::Id) -> StoreResult<Option<Record<T>>>;

    /// All records, oldest first.
    async fn find_all(&self) -> StoreResult<Vec<Record<T>>>;

    /// Overwrite the fields of an existing record, keeping its id.
    async fn replace(&self, id: T::Id, data: T) -> StoreResult<Option<Record<T>>>;

    /// Remove a record, returning what was removed.
    async fn delete(&self, id: T::Id) -> StoreResult<Option<Record<T>>>;
}
