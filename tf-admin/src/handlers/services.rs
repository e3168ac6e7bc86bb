use crate::handlers::{error_response, not_found};
use crate::models::{CreateServiceRequest, UpdateServiceRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Response {
    match state.storage.list_services().await {
        Ok(services) => Json(services).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Response {
    let mut service = match req.into_service() {
        Ok(service) => service,
        Err(e) => return error_response(e),
    };
    match state.storage.create_service(&mut service).await {
        Ok(()) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.get_service(id).await {
        Ok(Some(service)) => Json(service).into_response(),
        Ok(None) => not_found("service"),
        Err(e) => error_response(e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> Response {
    let mut service = match state.storage.get_service(id).await {
        Ok(Some(service)) => service,
        Ok(None) => return not_found("service"),
        Err(e) => return error_response(e),
    };
    if let Err(e) = req.apply(&mut service) {
        return error_response(e);
    }
    match state.storage.update_service(&service).await {
        Ok(()) => Json(service).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.delete_service(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("service"),
        Err(e) => error_response(e),
    }
}
