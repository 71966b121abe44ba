use serde::{Deserialize, Serialize};

use catalog_core::{CategoryId, Document, DomainError, DomainResult, MaterialId, MediaId, ProductId};

use crate::attributes::{Category, CategoryPatch, Material, MaterialPatch, Media, MediaPatch, RecordPatch};
use crate::sku::HashedSku;

/// Product availability.
///
/// Wire names match what the storefront sends (`"Out of Stock"` has spaces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Available,
    #[serde(rename = "Out of Stock", alias = "OutOfStock")]
    OutOfStock,
    Discontinued,
}

/// Stored product document.
///
/// The three satellite records are referenced by id only. Each one is owned
/// by exactly this product; the composition service keeps that true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub status: ProductStatus,
    pub sku: HashedSku,
    pub category: CategoryId,
    pub material: MaterialId,
    pub image: MediaId,
}

impl Document for Product {
    type Id = ProductId;

    const COLLECTION: &'static str = "products";
}

/// Everything needed to create a product and its satellites.
///
/// `sku` is the plaintext value; it is hashed before anything is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub status: ProductStatus,
    pub category: Category,
    pub material: Material,
    pub image: Media,
}

impl NewProduct {
    /// Validate the whole input before any record is written.
    pub fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        validate_name(&self.name)?;
        validate_price(self.price)?;
        self.category.validate()?;
        self.material.validate()?;
        self.image.validate()?;
        Ok(())
    }
}

/// Partial update. `None` leaves the stored value untouched.
///
/// The SKU is deliberately absent: the stored hash survives every update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub status: Option<ProductStatus>,
    pub category: Option<CategoryPatch>,
    pub material: Option<MaterialPatch>,
    pub image: Option<MediaPatch>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(category) = &self.category {
            category.validate()?;
        }
        if let Some(material) = &self.material {
            material.validate()?;
        }
        if let Some(image) = &self.image {
            image.validate()?;
        }
        Ok(())
    }

    /// Apply the core fields to a stored product. References are never touched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::validation(format!(
            "price must be a positive number (got {price})"
        )));
    }
    Ok(())
}
