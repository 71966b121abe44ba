use serde::Deserialize;

use catalog_products::{
    Category, CategoryPatch, Material, MaterialPatch, Media, MediaPatch, NewProduct, ProductPatch,
    ProductStatus,
};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /products` body, in the storefront's field names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub status: ProductStatus,
    pub category_data: Category,
    pub material_data: Material,
    #[serde(default)]
    pub image_data: Media,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            sku: req.sku,
            name: req.name,
            price: req.price,
            status: req.status,
            category: req.category_data,
            material: req.material_data,
            image: req.image_data,
        }
    }
}

/// `PATCH /products/{id}` body. Every field is optional, including the
/// fields inside `categoryData`, `materialData` and `imageData`.
///
/// `sku` is accepted so the edit form can send the product back as-is, but
/// the stored hash is never replaced.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub status: Option<ProductStatus>,
    pub category_data: Option<CategoryPatch>,
    pub material_data: Option<MaterialPatch>,
    pub image_data: Option<MediaPatch>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> ProductPatch {
        if self.sku.is_some() {
            tracing::debug!("ignoring sku in update; stored hash is kept");
        }
        ProductPatch {
            name: self.name,
            price: self.price,
            status: self.status,
            category: self.category_data,
            material: self.material_data,
            image: self.image_data,
        }
    }
}
