//! Read side: composed product views and the price histogram.

use serde::Serialize;

use catalog_core::{ProductId, Record};
use catalog_products::{PriceRangeCount, Product, price_histogram};

use crate::error::CatalogError;
use crate::repositories::Repositories;
use crate::view::ProductView;

/// Product list plus the price-bucket histogram, as one logical view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub products: Vec<ProductView>,
    pub price_ranges: Vec<PriceRangeCount>,
}

/// Read-only queries over the product collection.
#[derive(Clone)]
pub struct CatalogQueryService {
    repos: Repositories,
}

impl CatalogQueryService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// All products with references resolved, and the histogram.
    ///
    /// The two are independent reads of the same collection and run
    /// concurrently.
    pub async fn list_with_price_histogram(&self) -> Result<CatalogListing, CatalogError> {
        let (products, price_ranges) =
            tokio::try_join!(self.list_resolved(), self.price_histogram())?;

        tracing::debug!(
            products = products.len(),
            buckets = price_ranges.len(),
            "catalog listing assembled"
        );

        Ok(CatalogListing {
            products,
            price_ranges,
        })
    }

    pub async fn list_resolved(&self) -> Result<Vec<ProductView>, CatalogError> {
        let records = self.repos.products.find_all().await?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(self.compose(record).await?);
        }
        Ok(views)
    }

    pub async fn price_histogram(&self) -> Result<Vec<PriceRangeCount>, CatalogError> {
        let records = self.repos.products.find_all().await?;
        Ok(price_histogram(records.iter().map(|r| r.data.price)))
    }

    /// One product with references resolved; `None` when the id does not exist.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<ProductView>, CatalogError> {
        match self.repos.products.find_by_id(id).await? {
            Some(record) => Ok(Some(self.compose(record).await?)),
            None => Ok(None),
        }
    }

    /// Resolve the three reference ids of a stored product by keyed lookups.
    pub async fn compose(&self, record: Record<Product>) -> Result<ProductView, CatalogError> {
        let (category, material, image) = tokio::try_join!(
            self.repos.categories.find_by_id(record.data.category),
            self.repos.materials.find_by_id(record.data.material),
            self.repos.media.find_by_id(record.data.image),
        )?;

        if category.is_none() || material.is_none() || image.is_none() {
            tracing::warn!(product_id = %record.id, "product has dangling references");
        }

        Ok(ProductView::compose(record, category, material, image))
    }
}
