//! Manual one-time fixup endpoints. Each takes JSON params, runs the
//! shared maintenance operation, and answers with a JSON summary.

use crate::handlers::error_response;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tf_core::maintenance;
use tf_core::storage::TitleFilter;

#[derive(Debug, Default, Deserialize)]
pub struct CleanupParams {
    /// Title filters to apply; the default set covers the known leftover
    /// test rows.
    pub filters: Option<Vec<TitleFilter>>,
}

pub async fn cleanup_test_ads(
    State(state): State<AppState>,
    Json(params): Json<CleanupParams>,
) -> Response {
    let filters = params
        .filters
        .unwrap_or_else(maintenance::default_test_ad_filters);
    match maintenance::cleanup_test_ads(state.storage.clone(), &filters).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn migrate_legacy_ads(State(state): State<AppState>) -> Response {
    match maintenance::migrate_legacy_ads(state.storage.clone()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn recompute_ad_counters(State(state): State<AppState>) -> Response {
    match maintenance::recompute_ad_counters(state.storage.clone()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use std::sync::Arc;
    use tf_core::domain::{AdType, Advertisement};
    use tf_core::storage::{InMemoryStorage, Storage};

    #[tokio::test]
    async fn cleanup_endpoint_uses_defaults_when_no_filters_given() {
        let storage = Arc::new(InMemoryStorage::new());
        let now = Utc::now();
        for title in ["test row", "real campaign"] {
            let mut ad = Advertisement {
                id: None,
                title: title.to_string(),
                ad_code: String::new(),
                ad_type: AdType::Banner,
                placement: "header".to_string(),
                is_active: false,
                is_paused: false,
                view_count: 0,
                click_count: 0,
                start_date: None,
                end_date: None,
                width: None,
                height: None,
                created_at: now,
                updated_at: now,
            };
            storage.create_advertisement(&mut ad).await.unwrap();
        }

        let state = AppState::new(storage.clone());
        let resp = cleanup_test_ads(State(state), Json(CleanupParams::default())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(storage.list_advertisements().await.unwrap().len(), 1);
    }
}
