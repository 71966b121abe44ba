use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::DomainError;
use catalog_infra::CatalogError;

/// Map a service error to a response. `context` is the human-readable
/// message used for server-side failures.
pub fn catalog_error_to_response(err: CatalogError, context: &'static str) -> axum::response::Response {
    match err {
        CatalogError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        CatalogError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", msg)
        }
        CatalogError::ProductNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "Product not found")
        }
        other => {
            let code = match &other {
                CatalogError::Cascade { .. } => "cascade_error",
                CatalogError::Sku(_) => "sku_error",
                _ => "store_error",
            };
            tracing::error!(error = %other, "{context}");
            json_failure(StatusCode::INTERNAL_SERVER_ERROR, code, context, other.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Like `json_error`, plus the raw underlying error text.
pub fn json_failure(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    detail: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "detail": detail.into(),
        })),
    )
        .into_response()
}
