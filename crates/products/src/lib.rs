//! Product catalog domain module.
//!
//! This crate contains the catalog's records and rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod attributes;
pub mod pricing;
pub mod product;
pub mod sku;

pub use attributes::{
    Category, CategoryPatch, Material, MaterialPatch, Media, MediaPatch, RecordPatch,
};
pub use pricing::{PriceBucket, PriceRangeCount, price_histogram};
pub use product::{NewProduct, Product, ProductPatch, ProductStatus};
pub use sku::{HashedSku, SkuError};
