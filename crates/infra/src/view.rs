//! Composed product view: stored product with its references resolved.

use serde::Serialize;

use catalog_core::{ProductId, Record};
use catalog_products::{Category, HashedSku, Material, Media, Product, ProductStatus};

/// Product as presented to clients.
///
/// Distinct from the stored `Product`: the three reference ids are replaced
/// by the records they point at. A dangling reference shows up as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub status: ProductStatus,
    pub sku: HashedSku,
    pub category: Option<Record<Category>>,
    pub material: Option<Record<Material>>,
    pub image: Option<Record<Media>>,
}

impl ProductView {
    pub fn compose(
        product: Record<Product>,
        category: Option<Record<Category>>,
        material: Option<Record<Material>>,
        image: Option<Record<Media>>,
    ) -> Self {
        let Record { id, data } = product;
        Self {
            id,
            name: data.name,
            price: data.price,
            status: data.status,
            sku: data.sku,
            category,
            material,
            image,
        }
    }
}
