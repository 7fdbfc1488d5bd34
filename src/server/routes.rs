//! HTTP handlers
//!
//! Handlers only launch tasks and read the store; crawl results are never
//! passed back directly.

use crate::server::error::ApiError;
use crate::server::AppState;
use crate::storage::CrawlTask;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    pub fqdn: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlResponse {
    #[serde(rename = "taskID")]
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub term: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub docs: Vec<String>,
}

/// Liveness probe
pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "app running".to_string(),
    })
}

/// Starts a crawl of the requested domain
pub async fn crawl_handler(
    State(state): State<AppState>,
    body: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CrawlResponse>), ApiError> {
    let Json(request) = body?;
    let task_id = state.registry.launch(&request.fqdn)?;

    tracing::info!("Launched task {} for {}", task_id, request.fqdn);
    Ok((StatusCode::CREATED, Json(CrawlResponse { task_id })))
}

/// Reports the stored record of a crawl task
pub async fn task_status_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<CrawlTask>, ApiError> {
    state
        .store
        .task(&task_id)?
        .map(Json)
        .ok_or(ApiError::TaskNotFound(task_id))
}

/// Full-text search over the stored document texts
pub async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SearchResponse>), ApiError> {
    let Json(request) = body?;
    let docs = state.store.search(&request.term)?;

    Ok((StatusCode::CREATED, Json(SearchResponse { docs })))
}
