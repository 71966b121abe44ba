use std::sync::RwLock;

use catalog_core::{Document, Record, RecordId};

use super::r#trait::{DocumentStore, StoreError, StoreResult};

/// In-memory document collection.
///
/// Intended for tests/dev. Records are kept in insertion order; lookups are
/// linear, which is fine at catalog scale.
#[derive(Debug)]
pub struct InMemoryDocumentStore<T: Document> {
    records: RwLock<Vec<Record<T>>>,
}

impl<T: Document> InMemoryDocumentStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Document> Default for InMemoryDocumentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::backend(operation, "lock poisoned")
}

#[async_trait::async_trait]
impl<T: Document> DocumentStore<T> for InMemoryDocumentStore<T> {
    async fn insert(&self, data: T) -> StoreResult<Record<T>> {
        let record = Record::new(T::Id::generate(), data);
        let mut records = self.records.write().map_err(|_| poisoned("insert"))?;
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: T::Id) -> StoreResult<Option<Record<T>>> {
        let records = self.records.read().map_err(|_| poisoned("find_by_id"))?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Record<T>>> {
        let records = self.records.read().map_err(|_| poisoned("find_all"))?;
        Ok(records.clone())
    }

    async fn replace(&self, id: T::Id, data: T) -> StoreResult<Option<Record<T>>> {
        let mut records = self.records.write().map_err(|_| poisoned("replace"))?;
        Ok(records.iter_mut().find(|r| r.id == id).map(|r| {
            r.data = data;
            r.clone()
        }))
    }

    async fn delete(&self, id: T::Id) -> StoreResult<Option<Record<T>>> {
        let mut records = self.records.write().map_err(|_| poisoned("delete"))?;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|idx| records.remove(idx)))
    }
}
