//! HTTP request handlers

use crate::stats::{StatsCache, StatsSnapshot};
use axum::{extract::State, response::Json};
use std::sync::Arc;

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<StatsCache>,
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "wg-dash"
    }))
}

/// Stats endpoint. Always 200: a failed refresh shows up as the degraded
/// `{"error": ...}` body, never as a 5xx.
pub async fn wireguard(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.fetch().await.as_ref().clone())
}
