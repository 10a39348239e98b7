use std::sync::Arc;

use ai_llm_service::telemetry;
use anyhow::Context;
use api::core::app_state::AppState;
use tracing::{Level, info, warn};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file; a missing file is fine.
    let dotenv = dotenvy::dotenv();

    let filter = telemetry::env_filter_with_level("info", Level::INFO);
    // library events are rendered by the telemetry layer
    let app_layer = fmt::layer()
        .with_target(true)
        .with_filter(filter::filter_fn(|meta| !telemetry::is_library_target(meta.target())));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .try_init()
        .context("setting default subscriber failed")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    let state = AppState::from_env().context("invalid configuration")?;
    info!(backend = %state.backend, version = env!("CARGO_PKG_VERSION"), "starting product-qa");

    api::start(Arc::new(state)).await.context("http server failed")?;

    Ok(())
}
