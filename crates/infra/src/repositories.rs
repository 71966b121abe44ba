//! The four catalog collections, wired once at start-up.

use std::sync::Arc;

use catalog_products::{Category, Material, Media, Product};
use sqlx::PgPool;

use crate::document_store::{
    DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreResult,
};

/// Handles to every collection the catalog services touch.
///
/// Constructed at process start and handed to the services; nothing looks
/// collections up globally.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn DocumentStore<Product>>,
    pub categories: Arc<dyn DocumentStore<Category>>,
    pub materials: Arc<dyn DocumentStore<Material>>,
    pub media: Arc<dyn DocumentStore<Media>>,
}

impl Repositories {
    /// In-memory collections (dev/test).
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryDocumentStore::<Product>::new()),
            categories: Arc::new(InMemoryDocumentStore::<Category>::new()),
            materials: Arc::new(InMemoryDocumentStore::<Material>::new()),
            media: Arc::new(InMemoryDocumentStore::<Media>::new()),
        }
    }

    /// Postgres collections sharing one pool. Tables are created if missing.
    pub async fn postgres(pool: PgPool) -> StoreResult<Self> {
        let products = PostgresDocumentStore::<Product>::new(pool.clone());
        let categories = PostgresDocumentStore::<Category>::new(pool.clone());
        let materials = PostgresDocumentStore::<Material>::new(pool.clone());
        let media = PostgresDocumentStore::<Media>::new(pool);

        products.ensure_collection().await?;
        categories.ensure_collection().await?;
        materials.ensure_collection().await?;
        media.ensure_collection().await?;

        Ok(Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
            materials: Arc::new(materials),
            media: Arc::new(media),
        })
    }
}
