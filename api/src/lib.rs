use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::json_error_mapper,
    routes::{health_route::health, query::query_route::query},
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";

/// Router with every endpoint and the rejection mapper attached.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/query", post(query))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds `API_ADDRESS` (default `0.0.0.0:8080`) and serves until Ctrl+C.
pub async fn start(state: Arc<AppState>) -> AppResult<()> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "http server listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("http server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        // never resolve: without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
}
