//! HTTP API server
//!
//! This module wires the store, the crawl collaborators and the task registry
//! into an axum router, and owns the serve/shutdown sequence:
//! - Open the store and (re)build the full-text index
//! - Start the expiry sweeper
//! - Serve until Ctrl-C, then wait for running crawl tasks

mod error;
mod routes;
mod sweeper;

pub use error::ApiError;
pub use routes::{CrawlRequest, CrawlResponse, SearchRequest, SearchResponse, StatusResponse};
pub use sweeper::spawn_expiry_sweeper;

use crate::config::Config;
use crate::crawler::{CrawlContext, HttpFetcher, TaskRegistry, TikaExtractor};
use crate::storage::{DocumentStore, SqliteStore};
use axum::routing::{get, post, put};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub registry: Arc<TaskRegistry>,
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root_handler))
        .route("/crawl", post(routes::crawl_handler))
        .route("/status/tasks/:task_id", get(routes::task_status_handler))
        .route("/search", put(routes::search_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the service until Ctrl-C
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(())` - Shut down cleanly after all crawl tasks finished
/// * `Err(CrawldexError)` - The store, an HTTP client or the listener could
///   not be set up
pub async fn run(config: Config) -> crate::Result<()> {
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteStore::open(Path::new(&config.storage.database_path))?);
    tracing::info!("Opened store at {}", config.storage.database_path);

    match store.build_index() {
        Ok(()) => tracing::info!("Full-text index built"),
        Err(e) => tracing::warn!("Failed to build full-text index: {}", e),
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let extractor = Arc::new(TikaExtractor::new(&config.extractor)?);
    tracing::info!("Text extraction via {}", extractor.endpoint());

    let context = CrawlContext::new(fetcher, extractor, store.clone());
    let registry = Arc::new(TaskRegistry::new(context, config.tasks.max_running));

    let sweeper = spawn_expiry_sweeper(
        store.clone(),
        Duration::from_secs(config.storage.sweep_interval_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app = router(AppState {
        store,
        registry: registry.clone(),
    });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!(
        "Shutting down, waiting for {} running crawl task(s)",
        registry.running()
    );
    registry.join_all().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
