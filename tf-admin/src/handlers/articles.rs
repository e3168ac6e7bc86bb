use crate::handlers::{error_response, not_found};
use crate::models::{CreateArticleRequest, UpdateArticleRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Response {
    match state.storage.list_articles().await {
        Ok(articles) => Json(articles).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateArticleRequest>,
) -> Response {
    let mut article = match req.into_article() {
        Ok(article) => article,
        Err(e) => return error_response(e),
    };
    match state.storage.create_article(&mut article).await {
        Ok(()) => (StatusCode::CREATED, Json(article)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.get_article(id).await {
        Ok(Some(article)) => Json(article).into_response(),
        Ok(None) => not_found("article"),
        Err(e) => error_response(e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateArticleRequest>,
) -> Response {
    let mut article = match state.storage.get_article(id).await {
        Ok(Some(article)) => article,
        Ok(None) => return not_found("article"),
        Err(e) => return error_response(e),
    };
    if let Err(e) = req.apply(&mut article) {
        return error_response(e);
    }
    match state.storage.update_article(&article).await {
        Ok(()) => Json(article).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.delete_article(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("article"),
        Err(e) => error_response(e),
    }
}
