use crate::handlers::{error_response, not_found};
use crate::models::{CreateAiToolRequest, UpdateAiToolRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Response {
    match state.storage.list_ai_tools().await {
        Ok(tools) => Json(tools).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateAiToolRequest>,
) -> Response {
    let mut tool = match req.into_tool() {
        Ok(tool) => tool,
        Err(e) => return error_response(e),
    };
    match state.storage.create_ai_tool(&mut tool).await {
        Ok(()) => (StatusCode::CREATED, Json(tool)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.get_ai_tool(id).await {
        Ok(Some(tool)) => Json(tool).into_response(),
        Ok(None) => not_found("ai_tool"),
        Err(e) => error_response(e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAiToolRequest>,
) -> Response {
    let mut tool = match state.storage.get_ai_tool(id).await {
        Ok(Some(tool)) => tool,
        Ok(None) => return not_found("ai_tool"),
        Err(e) => return error_response(e),
    };
    if let Err(e) = req.apply(&mut tool) {
        return error_response(e);
    }
    match state.storage.update_ai_tool(&tool).await {
        Ok(()) => Json(tool).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.delete_ai_tool(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("ai_tool"),
        Err(e) => error_response(e),
    }
}
