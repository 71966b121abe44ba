//! Postgres-backed document store.
//!
//! Each collection is one table holding the document as JSONB next to its
//! UUID primary key. Table names come from `Document::COLLECTION`, which is a
//! compile-time constant, never user input.

use std::marker::PhantomData;

use catalog_core::{Document, Record, RecordId};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::r#trait::{DocumentStore, StoreError, StoreResult};

/// SQL statements for one collection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSql {
    pub create_table: String,
    pub insert: String,
    pub find_by_id: String,
    pub find_all: String,
    pub replace: String,
    pub delete: String,
}

impl CollectionSql {
    pub fn for_collection(table: &str) -> Self {
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 id UUID PRIMARY KEY, \
                 body JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT now())"
            ),
            insert: format!("INSERT INTO {table} (id, body) VALUES ($1, $2)"),
            find_by_id: format!("SELECT id, body FROM {table} WHERE id = $1"),
            find_all: format!("SELECT id, body FROM {table} ORDER BY created_at ASC, id ASC"),
            replace: format!("UPDATE {table} SET body = $2 WHERE id = $1 RETURNING id, body"),
            delete: format!("DELETE FROM {table} WHERE id = $1 RETURNING id, body"),
        }
    }
}

/// Postgres document collection for documents of type `T`.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is cheap to clone and shareable.
pub struct PostgresDocumentStore<T> {
    pool: PgPool,
    sql: CollectionSql,
    _doc: PhantomData<fn() -> T>,
}

impl<T: Document> PostgresDocumentStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sql: CollectionSql::for_collection(T::COLLECTION),
            _doc: PhantomData,
        }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_collection(&self) -> StoreResult<()> {
        sqlx::query(&self.sql.create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_collection", e))?;
        tracing::debug!(collection = T::COLLECTION, "collection ready");
        Ok(())
    }

    fn encode(data: &T) -> StoreResult<serde_json::Value> {
        serde_json::to_value(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(row: &PgRow) -> StoreResult<Record<T>> {
        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| StoreError::Serialization(format!("failed to read id: {e}")))?;
        let body: serde_json::Value = row
            .try_get("body")
            .map_err(|e| StoreError::Serialization(format!("failed to read body: {e}")))?;
        let data: T = serde_json::from_value(body).map_err(|e| {
            StoreError::Serialization(format!("{} record {id}: {e}", T::COLLECTION))
        })?;
        Ok(Record::new(T::Id::from_uuid(id), data))
    }
}

#[async_trait::async_trait]
impl<T: Document> DocumentStore<T> for PostgresDocumentStore<T> {
    async fn insert(&self, data: T) -> StoreResult<Record<T>> {
        let id = T::Id::generate();
        let body = Self::encode(&data)?;

        sqlx::query(&self.sql.insert)
            .bind(*id.as_uuid())
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(Record::new(id, data))
    }

    async fn find_by_id(&self, id: T::Id) -> StoreResult<Option<Record<T>>> {
        let row = sqlx::query(&self.sql.find_by_id)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Record<T>>> {
        let rows = sqlx::query(&self.sql.find_all)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn replace(&self, id: T::Id, data: T) -> StoreResult<Option<Record<T>>> {
        let body = Self::encode(&data)?;
        let row = sqlx::query(&self.sql.replace)
            .bind(*id.as_uuid())
            .bind(body)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("replace", e))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn delete(&self, id: T::Id) -> StoreResult<Option<Record<T>>> {
        let row = sqlx::query(&self.sql.delete)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        row.as_ref().map(Self::decode).transpose()
    }
}

/// Map SQLx errors to store errors, keeping the driver's message.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::backend(
            operation,
            format!("database error: {}", db_err.message()),
        ),
        sqlx::Error::PoolTimedOut => StoreError::backend(operation, "connection pool timed out"),
        other => StoreError::backend(operation, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_target_the_collection_table() {
        let sql = CollectionSql::for_collection("categories");
        assert!(sql.create_table.starts_with("CREATE TABLE IF NOT EXISTS categories ("));
        assert!(sql.create_table.contains("body JSONB NOT NULL"));
        assert_eq!(sql.insert, "INSERT INTO categories (id, body) VALUES ($1, $2)");
        assert!(sql.find_all.ends_with("ORDER BY created_at ASC, id ASC"));
        assert!(sql.replace.contains("RETURNING id, body"));
        assert!(sql.delete.starts_with("DELETE FROM categories"));
    }

    #[test]
    fn pool_timeouts_are_reported_with_the_operation() {
        let err = map_sqlx_error("find_all", sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "find_all failed: connection pool timed out");
    }
}
