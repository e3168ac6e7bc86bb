use crate::handlers::{error_response, not_found};
use crate::models::{CreateAdRequest, UpdateAdRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Response {
    match state.storage.list_advertisements().await {
        Ok(ads) => Json(ads).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create(State(state): State<AppState>, Json(req): Json<CreateAdRequest>) -> Response {
    let mut ad = match req.into_ad() {
        Ok(ad) => ad,
        Err(e) => return error_response(e),
    };
    match state.storage.create_advertisement(&mut ad).await {
        Ok(()) => (StatusCode::CREATED, Json(ad)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.get_advertisement(id).await {
        Ok(Some(ad)) => Json(ad).into_response(),
        Ok(None) => not_found("advertisement"),
        Err(e) => error_response(e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAdRequest>,
) -> Response {
    let mut ad = match state.storage.get_advertisement(id).await {
        Ok(Some(ad)) => ad,
        Ok(None) => return not_found("advertisement"),
        Err(e) => return error_response(e),
    };
    if let Err(e) = req.apply(&mut ad) {
        return error_response(e);
    }
    match state.storage.update_advertisement(&ad).await {
        Ok(()) => Json(ad).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.delete_advertisement(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("advertisement"),
        Err(e) => error_response(e),
    }
}

pub async fn toggle_active(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.toggle_ad_active(id).await {
        Ok(ad) => Json(ad).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn toggle_paused(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.toggle_ad_paused(id).await {
        Ok(ad) => Json(ad).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn record_view(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.record_ad_view(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn record_click(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.storage.record_ad_click(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Ads that should currently render in the given placement slot.
pub async fn serve_placement(
    State(state): State<AppState>,
    Path(placement): Path<String>,
) -> Response {
    match state.storage.list_live_ads(&placement, Utc::now()).await {
        Ok(ads) => Json(ads).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tf_core::domain::AdType;
    use tf_core::storage::InMemoryStorage;

    fn test_state() -> AppState {
        AppState::new(Arc::new(InMemoryStorage::new()))
    }

    fn create_req(title: &str, placement: &str) -> CreateAdRequest {
        CreateAdRequest {
            title: title.to_string(),
            ad_code: "<div>ad</div>".to_string(),
            ad_type: AdType::Html,
            placement: placement.to_string(),
            is_active: true,
            start_date: None,
            end_date: None,
            width: None,
            height: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let state = test_state();
        let resp = create(State(state.clone()), Json(create_req("Header", "header"))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let ads = state.storage.list_advertisements().await.unwrap();
        let id = ads[0].id.unwrap();
        let resp = get(State(state), Path(id)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_without_title_is_unprocessable() {
        let state = test_state();
        let resp = create(State(state), Json(create_req("", "header"))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn toggle_endpoints_flip_and_restore() {
        let state = test_state();
        create(State(state.clone()), Json(create_req("Sidebar", "sidebar"))).await;
        let id = state.storage.list_advertisements().await.unwrap()[0]
            .id
            .unwrap();

        let resp = toggle_paused(State(state.clone()), Path(id)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.storage.get_advertisement(id).await.unwrap().unwrap().is_paused);

        toggle_paused(State(state.clone()), Path(id)).await;
        assert!(!state.storage.get_advertisement(id).await.unwrap().unwrap().is_paused);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = test_state();
        let resp = get(State(state.clone()), Path(Uuid::new_v4())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = toggle_active(State(state), Path(Uuid::new_v4())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
