pub mod ads;
pub mod articles;
pub mod pages;
pub mod services;
pub mod tasks;
pub mod tools;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tf_core::error::CmsError;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tf-admin",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Map storage/validation errors onto the status codes the admin screens
/// branch on.
pub fn error_response(e: CmsError) -> Response {
    let status = match &e {
        CmsError::NotFound(_) => StatusCode::NOT_FOUND,
        CmsError::Validation(_) | CmsError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {}", e);
    }
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

pub fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("{what} not found") })),
    )
        .into_response()
}
