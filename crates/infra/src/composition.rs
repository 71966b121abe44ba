//! Write side: a product and its three owned records, kept in lockstep.
//!
//! Every operation touches four collections in sequence. There is no
//! transaction: a failure part-way leaves the completed steps committed, and
//! the error names the step that failed.

use serde::Serialize;

use catalog_core::{Document, ProductId, Record};
use catalog_products::{HashedSku, NewProduct, Product, ProductPatch, RecordPatch, SkuError};

use crate::document_store::DocumentStore;
use crate::error::{CascadeAction, CascadeStep, CatalogError};
use crate::repositories::Repositories;
use crate::view::ProductView;

/// Records already written (or removed) by an operation that later failed.
#[derive(Debug, Default)]
struct Committed(Vec<(&'static str, String)>);

impl Committed {
    fn push<T: Document>(&mut self, id: T::Id) {
        self.0.push((T::COLLECTION, id.to_string()));
    }

    fn report(&self, operation: &'static str, err: &CatalogError) {
        if self.0.is_empty() {
            return;
        }
        tracing::warn!(
            operation,
            error = %err,
            committed = ?self.0,
            "product cascade failed part-way; completed steps stay committed"
        );
    }
}

fn payload_of<T: Serialize>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn step_failed<T: Document>(
    action: CascadeAction,
    payload: String,
) -> impl FnOnce(crate::document_store::StoreError) -> CatalogError {
    move |source| CatalogError::Cascade {
        step: CascadeStep {
            action,
            collection: T::COLLECTION,
        },
        payload,
        source,
    }
}

async fn create_step<T: Document>(
    store: &dyn DocumentStore<T>,
    data: T,
) -> Result<Record<T>, CatalogError> {
    let payload = payload_of(&data);
    tracing::debug!(collection = T::COLLECTION, "creating record");
    store
        .insert(data)
        .await
        .map_err(step_failed::<T>(CascadeAction::Create, payload))
}

/// Merge a patch into an owned record and write it back under the same id,
/// or just read the record when the patch changes nothing. Never creates.
async fn update_step<T, P>(
    store: &dyn DocumentStore<T>,
    id: T::Id,
    patch: Option<&P>,
    committed: &mut Committed,
) -> Result<Option<Record<T>>, CatalogError>
where
    T: Document,
    P: RecordPatch<T>,
{
    let Some(mut current) = store.find_by_id(id).await? else {
        tracing::warn!(collection = T::COLLECTION, %id, "owned record is missing");
        return Ok(None);
    };
    let Some(patch) = patch.filter(|p| !p.is_empty()) else {
        return Ok(Some(current));
    };

    patch.apply_to(&mut current.data);
    let payload = payload_of(&current.data);
    tracing::debug!(collection = T::COLLECTION, %id, "updating record in place");
    let updated = store
        .replace(id, current.data)
        .await
        .map_err(step_failed::<T>(CascadeAction::Update, payload))?;
    committed.push::<T>(id);
    Ok(updated)
}

async fn delete_step<T: Document>(
    store: &dyn DocumentStore<T>,
    id: T::Id,
) -> Result<(), CatalogError> {
    tracing::debug!(collection = T::COLLECTION, %id, "deleting record");
    let removed = store
        .delete(id)
        .await
        .map_err(step_failed::<T>(CascadeAction::Delete, format!("{{\"id\":\"{id}\"}}")))?;
    if removed.is_none() {
        tracing::warn!(collection = T::COLLECTION, %id, "owned record was already missing");
    }
    Ok(())
}

async fn hash_sku(raw: String) -> Result<HashedSku, CatalogError> {
    let hashed = tokio::task::spawn_blocking(move || HashedSku::hash(&raw))
        .await
        .map_err(|e| SkuError::Hash(e.to_string()))??;
    Ok(hashed)
}

/// Create, update and delete products together with their satellites.
#[derive(Clone)]
pub struct ProductCompositionService {
    repos: Repositories,
}

impl ProductCompositionService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Create the category, material and media records, then the product
    /// pointing at them. Returns the stored product with raw reference ids.
    pub async fn create(&self, input: NewProduct) -> Result<Record<Product>, CatalogError> {
        input.validate()?;

        let mut committed = Committed::default();
        let result = self.create_cascade(input, &mut committed).await;
        match &result {
            Ok(product) => tracing::info!(product_id = %product.id, "product created"),
            Err(err) => committed.report("create", err),
        }
        result
    }

    async fn create_cascade(
        &self,
        input: NewProduct,
        committed: &mut Committed,
    ) -> Result<Record<Product>, CatalogError> {
        let NewProduct {
            sku,
            name,
            price,
            status,
            category,
            material,
            image,
        } = input;

        let category = create_step(&*self.repos.categories, category).await?;
        committed.push::<catalog_products::Category>(category.id);

        let material = create_step(&*self.repos.materials, material).await?;
        committed.push::<catalog_products::Material>(material.id);

        let image = create_step(&*self.repos.media, image).await?;
        committed.push::<catalog_products::Media>(image.id);

        let sku = hash_sku(sku).await?;

        let product = Product {
            name,
            price,
            status,
            sku,
            category: category.id,
            material: material.id,
            image: image.id,
        };
        create_step(&*self.repos.products, product).await
    }

    /// Apply a patch to an existing product and its satellites.
    ///
    /// Satellite data overwrites the records the product already owns; the
    /// ids never change. Returns the updated product with references resolved.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<ProductView, CatalogError> {
        patch.validate()?;

        let existing = self
            .repos
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut committed = Committed::default();
        let result = self.update_cascade(existing, patch, &mut committed).await;
        match &result {
            Ok(_) => tracing::info!(product_id = %id, "product updated"),
            Err(err) => committed.report("update", err),
        }
        result
    }

    async fn update_cascade(
        &self,
        existing: Record<Product>,
        patch: ProductPatch,
        committed: &mut Committed,
    ) -> Result<ProductView, CatalogError> {
        let Record { id, data: mut product } = existing;

        let category = update_step(
            &*self.repos.categories,
            product.category,
            patch.category.as_ref(),
            committed,
        )
        .await?;
        let material = update_step(
            &*self.repos.materials,
            product.material,
            patch.material.as_ref(),
            committed,
        )
        .await?;
        let image =
            update_step(&*self.repos.media, product.image, patch.image.as_ref(), committed).await?;

        patch.apply_to(&mut product);

        let payload = payload_of(&product);
        let updated = self
            .repos
            .products
            .replace(id, product)
            .await
            .map_err(step_failed::<Product>(CascadeAction::Update, payload))?
            .ok_or(CatalogError::ProductNotFound(id))?;

        Ok(ProductView::compose(updated, category, material, image))
    }

    /// Delete a product and the three records it owns.
    ///
    /// Existence is checked first: an unknown id touches nothing.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let existing = self
            .repos
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut committed = Committed::default();
        let result = self.delete_cascade(existing, &mut committed).await;
        match &result {
            Ok(()) => tracing::info!(product_id = %id, "product deleted"),
            Err(err) => committed.report("delete", err),
        }
        result
    }

    async fn delete_cascade(
        &self,
        existing: Record<Product>,
        committed: &mut Committed,
    ) -> Result<(), CatalogError> {
        let Record { id, data } = existing;

        delete_step(&*self.repos.categories, data.category).await?;
        committed.push::<catalog_products::Category>(data.category);

        delete_step(&*self.repos.materials, data.material).await?;
        committed.push::<catalog_products::Material>(data.material);

        delete_step(&*self.repos.media, data.image).await?;
        committed.push::<catalog_products::Media>(data.image);

        delete_step(&*self.repos.products, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document_store::{InMemoryDocumentStore, StoreError, StoreResult};
    use catalog_core::DomainError;
    use catalog_products::{Category, CategoryPatch, Material, MaterialPatch, Media, MediaPatch, ProductStatus};

    /// Store that fails every write and delegates reads.
    struct BrokenWrites<T: Document> {
        inner: Arc<dyn DocumentStore<T>>,
    }

    impl<T: Document> BrokenWrites<T> {
        fn new() -> Self {
            Self::over(Arc::new(InMemoryDocumentStore::new()))
        }

        fn over(inner: Arc<dyn DocumentStore<T>>) -> Self {
            Self { inner }
        }
    }

    #[async_trait::async_trait]
    impl<T: Document> DocumentStore<T> for BrokenWrites<T> {
        async fn insert(&self, _data: T) -> StoreResult<Record<T>> {
            Err(StoreError::backend("insert", "disk full"))
        }

        async fn find_by_id(&self, id: T::Id) -> StoreResult<Option<Record<T>>> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> StoreResult<Vec<Record<T>>> {
            self.inner.find_all().await
        }

        async fn replace(&self, _id: T::Id, _data: T) -> StoreResult<Option<Record<T>>> {
            Err(StoreError::backend("replace", "disk full"))
        }

        async fn delete(&self, _id: T::Id) -> StoreResult<Option<Record<T>>> {
            Err(StoreError::backend("delete", "disk full"))
        }
    }

    fn chair() -> NewProduct {
        NewProduct {
            sku: "A".repeat(20),
            name: "Chair".to_string(),
            price: 450.0,
            status: ProductStatus::Available,
            category: Category::new("Seating"),
            material: Material::new("Wood"),
            image: Media::new(Some("http://x/y.png".to_string())),
        }
    }

    #[tokio::test]
    async fn create_persists_three_owned_records_and_hashed_sku() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());

        let product = service.create(chair()).await.unwrap();

        let category = repos.categories.find_by_id(product.data.category).await.unwrap();
        let material = repos.materials.find_by_id(product.data.material).await.unwrap();
        let image = repos.media.find_by_id(product.data.image).await.unwrap();
        assert_eq!(category.unwrap().data.name, "Seating");
        assert_eq!(material.unwrap().data.name, "Wood");
        assert_eq!(image.unwrap().data.url.as_deref(), Some("http://x/y.png"));

        let stored = repos.products.find_by_id(product.id).await.unwrap().unwrap();
        let raw = "A".repeat(20);
        assert_ne!(stored.data.sku.as_str(), raw);
        assert!(stored.data.sku.verify(&raw));
    }

    #[tokio::test]
    async fn each_product_gets_its_own_satellites() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());

        let a = service.create(chair()).await.unwrap();
        let b = service.create(chair()).await.unwrap();

        assert_ne!(a.data.category, b.data.category);
        assert_ne!(a.data.material, b.data.material);
        assert_ne!(a.data.image, b.data.image);
        assert_eq!(repos.categories.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let mut input = chair();
        input.material = Material::new("");

        let err = service.create(input).await.unwrap_err();

        assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));
        assert!(repos.categories.find_all().await.unwrap().is_empty());
        assert!(repos.products.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_step_is_named_and_earlier_steps_stay_committed() {
        let mut repos = Repositories::in_memory();
        repos.media = Arc::new(BrokenWrites::<Media>::new());
        let service = ProductCompositionService::new(repos.clone());

        let err = service.create(chair()).await.unwrap_err();

        match &err {
            CatalogError::Cascade { step, payload, source } => {
                assert_eq!(step.action, CascadeAction::Create);
                assert_eq!(step.collection, "media");
                assert!(payload.contains("http://x/y.png"));
                assert_eq!(source, &StoreError::backend("insert", "disk full"));
            }
            other => panic!("expected cascade failure, got {other:?}"),
        }
        assert_eq!(repos.categories.find_all().await.unwrap().len(), 1);
        assert_eq!(repos.materials.find_all().await.unwrap().len(), 1);
        assert!(repos.products.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_mutates_owned_records_in_place() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let created = service.create(chair()).await.unwrap();

        let patch = ProductPatch {
            name: Some("Armchair".to_string()),
            price: Some(650.0),
            status: Some(ProductStatus::OutOfStock),
            category: Some(CategoryPatch::name("X")),
            ..ProductPatch::default()
        };
        let view = service.update(created.id, patch).await.unwrap();

        let category = view.category.unwrap();
        assert_eq!(category.id, created.data.category);
        assert_eq!(category.data.name, "X");
        assert_eq!(view.material.unwrap().data.name, "Wood");
        assert_eq!(view.name, "Armchair");
        assert_eq!(view.price, 650.0);
        assert_eq!(view.status, ProductStatus::OutOfStock);
        assert_eq!(view.sku, created.data.sku);

        assert_eq!(repos.categories.find_all().await.unwrap().len(), 1);
        let stored = repos.products.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.data.category, created.data.category);
        assert_eq!(stored.data.name, "Armchair");
    }

    #[tokio::test]
    async fn empty_satellite_patches_keep_stored_fields() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let created = service.create(chair()).await.unwrap();

        let patch = ProductPatch {
            category: Some(CategoryPatch::default()),
            image: Some(MediaPatch::default()),
            ..ProductPatch::default()
        };
        let view = service.update(created.id, patch).await.unwrap();

        assert_eq!(view.image.unwrap().data.url.as_deref(), Some("http://x/y.png"));
        assert_eq!(view.category.unwrap().data.name, "Seating");
        let stored = repos.media.find_by_id(created.data.image).await.unwrap().unwrap();
        assert_eq!(stored.data.url.as_deref(), Some("http://x/y.png"));
    }

    #[tokio::test]
    async fn update_failure_part_way_reports_the_step() {
        let mut repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let created = service.create(chair()).await.unwrap();

        repos.materials = Arc::new(BrokenWrites::over(repos.materials.clone()));
        let service = ProductCompositionService::new(repos.clone());

        let patch = ProductPatch {
            name: Some("Armchair".to_string()),
            category: Some(CategoryPatch::name("Office")),
            material: Some(MaterialPatch::name("Steel")),
            ..ProductPatch::default()
        };
        let err = service.update(created.id, patch).await.unwrap_err();

        match err {
            CatalogError::Cascade { step, payload, .. } => {
                assert_eq!(step.to_string(), "update materials");
                assert!(payload.contains("Steel"));
            }
            other => panic!("expected cascade failure, got {other:?}"),
        }
        let category = repos.categories.find_by_id(created.data.category).await.unwrap();
        assert_eq!(category.unwrap().data.name, "Office");
        let product = repos.products.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(product.data.name, "Chair");
    }

    #[tokio::test]
    async fn update_unknown_product_is_not_found() {
        let service = ProductCompositionService::new(Repositories::in_memory());
        let id = ProductId::new();

        let err = service.update(id, ProductPatch::default()).await.unwrap_err();

        assert!(matches!(err, CatalogError::ProductNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn delete_removes_product_and_owned_records() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let keep = service.create(chair()).await.unwrap();
        let doomed = service.create(chair()).await.unwrap();

        service.delete(doomed.id).await.unwrap();

        assert!(repos.products.find_by_id(doomed.id).await.unwrap().is_none());
        assert!(repos.categories.find_by_id(doomed.data.category).await.unwrap().is_none());
        assert!(repos.materials.find_by_id(doomed.data.material).await.unwrap().is_none());
        assert!(repos.media.find_by_id(doomed.data.image).await.unwrap().is_none());
        assert!(repos.categories.find_by_id(keep.data.category).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_unknown_product_touches_nothing() {
        let repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        service.create(chair()).await.unwrap();

        let err = service.delete(ProductId::new()).await.unwrap_err();

        assert!(matches!(err, CatalogError::ProductNotFound(_)));
        assert_eq!(repos.categories.find_all().await.unwrap().len(), 1);
        assert_eq!(repos.products.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_part_way_reports_the_step() {
        let mut repos = Repositories::in_memory();
        let service = ProductCompositionService::new(repos.clone());
        let created = service.create(chair()).await.unwrap();

        repos.materials = Arc::new(BrokenWrites::<Material>::new());
        let service = ProductCompositionService::new(repos.clone());

        let err = service.delete(created.id).await.unwrap_err();

        match err {
            CatalogError::Cascade { step, .. } => {
                assert_eq!(step.to_string(), "delete materials");
            }
            other => panic!("expected cascade failure, got {other:?}"),
        }
        assert!(repos.categories.find_by_id(created.data.category).await.unwrap().is_none());
        assert!(repos.products.find_by_id(created.id).await.unwrap().is_some());
    }
}
