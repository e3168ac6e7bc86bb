use crate::handlers::{error_response, not_found};
use crate::models::{CreatePageRequest, UpdatePageRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Response {
    match state.storage.list_pages().await {
        Ok(pages) => Json(pages).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create(State(state): State<AppState>, Json(req): Json<CreatePageRequest>) -> Response {
    let mut page = match req.into_page() {
        Ok(page) => page,
        Err(e) => return error_response(e),
    };
    match state.storage.create_page(&mut page).await {
        Ok(()) => (StatusCode::CREATED, Json(page)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.get_page(id).await {
        Ok(Some(page)) => Json(page).into_response(),
        Ok(None) => not_found("page"),
        Err(e) => error_response(e),
    }
}

pub async fn get_by_key(State(state): State<AppState>, Path(page_key): Path<String>) -> Response {
    match state.storage.get_page_by_key(&page_key).await {
        Ok(Some(page)) => Json(page).into_response(),
        Ok(None) => not_found("page"),
        Err(e) => error_response(e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePageRequest>,
) -> Response {
    let mut page = match state.storage.get_page(id).await {
        Ok(Some(page)) => page,
        Ok(None) => return not_found("page"),
        Err(e) => return error_response(e),
    };
    if let Err(e) = req.apply(&mut page) {
        return error_response(e);
    }
    match state.storage.update_page(&page).await {
        Ok(()) => Json(page).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.delete_page(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("page"),
        Err(e) => error_response(e),
    }
}
