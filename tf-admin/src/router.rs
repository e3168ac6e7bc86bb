use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{self, ads, articles, pages, services, tasks, tools};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/articles", get(articles::list).post(articles::create))
        .route(
            "/api/articles/:id",
            get(articles::get).put(articles::update).delete(articles::delete),
        )
        .route("/api/ai-tools", get(tools::list).post(tools::create))
        .route(
            "/api/ai-tools/:id",
            get(tools::get).put(tools::update).delete(tools::delete),
        )
        .route("/api/ads", get(ads::list).post(ads::create))
        .route(
            "/api/ads/:id",
            get(ads::get).put(ads::update).delete(ads::delete),
        )
        .route("/api/ads/:id/toggle-active", post(ads::toggle_active))
        .route("/api/ads/:id/toggle-paused", post(ads::toggle_paused))
        .route("/api/ads/:id/view", post(ads::record_view))
        .route("/api/ads/:id/click", post(ads::record_click))
        .route("/api/ads/serve/:placement", get(ads::serve_placement))
        .route("/api/pages", get(pages::list).post(pages::create))
        .route(
            "/api/pages/:id",
            get(pages::get).put(pages::update).delete(pages::delete),
        )
        .route("/api/pages/by-key/:page_key", get(pages::get_by_key))
        .route("/api/services", get(services::list).post(services::create))
        .route(
            "/api/services/:id",
            get(services::get).put(services::update).delete(services::delete),
        )
        // Manual one-time fixups, gated by the caller confirming in the UI
        .route("/admin/cleanup-test-ads", post(tasks::cleanup_test_ads))
        .route("/admin/migrate-legacy-ads", post(tasks::migrate_legacy_ads))
        .route(
            "/admin/recompute-ad-counters",
            post(tasks::recompute_ad_counters),
        )
        .layer(cors)
        .with_state(state)
}
