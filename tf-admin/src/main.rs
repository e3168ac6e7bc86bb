mod handlers;
mod logging;
mod models;
mod router;
mod state;

use state::AppState;
use std::env;
use std::sync::Arc;
use tf_core::storage::Storage;
use tracing::info;

#[cfg(feature = "db")]
async fn open_storage() -> anyhow::Result<Arc<dyn Storage>> {
    let storage = tf_core::storage::DatabaseStorage::new().await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "db"))]
async fn open_storage() -> anyhow::Result<Arc<dyn Storage>> {
    tracing::warn!("Built without the `db` feature; using in-memory storage");
    Ok(Arc::new(tf_core::storage::InMemoryStorage::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let storage = open_storage().await?;
    let app = router::app_router(AppState::new(storage));

    let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Admin API listening on {}", bind_addr);
    println!("Admin API listening on {bind_addr} (visit http://127.0.0.1:{port}/health)");
    axum::serve(listener, app).await?;
    Ok(())
}
