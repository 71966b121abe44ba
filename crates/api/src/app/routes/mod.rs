use axum::{Router, routing::delete};

pub mod products;
pub mod system;

/// Router for all catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .route("/products/", delete(products::delete_without_id))
}
