//! Infrastructure layer: document storage and the catalog services.

pub mod catalog_query;
pub mod composition;
pub mod document_store;
pub mod error;
pub mod repositories;
pub mod view;

pub use catalog_query::{CatalogListing, CatalogQueryService};
pub use composition::ProductCompositionService;
pub use error::{CascadeAction, CascadeStep, CatalogError};
pub use repositories::Repositories;
pub use view::ProductView;
