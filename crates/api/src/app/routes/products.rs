use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use catalog_core::ProductId;
use catalog_products::NewProduct;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_products)
                .post(create_product)
                .delete(delete_without_id),
        )
        .route(
            "/:id",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.query.list_with_price_histogram().await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Error while fetching data"),
    }
}

/// A well-formed id that matches nothing answers `200 null`.
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.query.get_by_id(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Error while fetching the data"),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    match services.composition.create(NewProduct::from(body)).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Product created successfully",
                "product": product,
            })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Error creating product"),
    }
}

/// The body is read raw so an empty one can be told apart from a bad one.
pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    if body.iter().all(u8::is_ascii_whitespace) {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "No data provided");
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let request: dto::UpdateProductRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.to_string()),
    };

    match services.composition.update(id, request.into_patch()).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Error updating product"),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.composition.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Product Deleted" })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Error occurred while deleting product"),
    }
}

pub async fn delete_without_id() -> axum::response::Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        "Please provide the product ID to delete",
    )
}
