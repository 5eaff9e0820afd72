pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analyzer::AddressAnalyzer;

pub struct AppState {
    pub analyzer: AddressAnalyzer,
}

pub fn router(analyzer: AddressAnalyzer) -> Router {
    let state = Arc::new(AppState { analyzer });

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/config", get(handlers::detection_config))
        .route("/api/v1/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until `shutdown` is cancelled.
pub async fn serve(
    analyzer: AddressAnalyzer,
    host: &str,
    port: u16,
    shutdown: CancellationToken,
) -> eyre::Result<()> {
    let app = router(analyzer);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

/// Run the API until `signal` resolves, then shut it down gracefully.
/// A server that fails on its own (e.g. the port is taken) ends the run with its error.
pub async fn run<F>(analyzer: AddressAnalyzer, host: &str, port: u16, signal: F) -> eyre::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let host = host.to_string();
    let mut server =
        tokio::spawn(async move { serve(analyzer, &host, port, server_shutdown).await });

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| eyre::eyre!("API server task failed: {}", e))??;
            tracing::warn!("API server exited before shutdown was requested");
        }
        received = signal => {
            received?;
            tracing::info!("Shutdown signal received, stopping API server...");
            shutdown.cancel();
            server
                .await
                .map_err(|e| eyre::eyre!("API server task failed: {}", e))??;
        }
    }

    Ok(())
}
