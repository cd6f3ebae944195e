//! HTTP server setup and management

use super::handlers::{AppState, health, wireguard};
use crate::stats::StatsCache;
use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let app = Router::new()
        .route("/api/wireguard", get(wireguard))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive());

    if static_dir.is_dir() {
        tracing::info!("serving dashboard from {}", static_dir.display());
        app.fallback_service(ServeDir::new(static_dir))
    } else {
        app
    }
}

/// Start the HTTP server and serve until ctrl-c
pub async fn start(bind: &str, static_dir: &Path, cache: Arc<StatsCache>) -> crate::Result<()> {
    let app = router(AppState { cache }, static_dir);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("HTTP server listening on http://{}/api/wireguard", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    handle_signal(tokio::signal::ctrl_c().await).await
}

/// Resolving this future stops the server, so a failed handler install
/// logs and parks forever instead of shutting down right after startup.
async fn handle_signal(ctrl_c: std::io::Result<()>) {
    if let Err(e) = ctrl_c {
        tracing::error!("failed to install ctrl-c handler: {}", e);
        std::future::pending::<()>().await;
    }
}
