use std::sync::Arc;

use ai_llm_service::{AiLlmError, LlmProvider, QaBackend, config::default_config::config_from_env};
use doc_qa::{QaConfig, QaError, QaPipeline};
use thiserror::Error;
use tracing::info;

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pipeline configuration: {0}")]
    Pipeline(#[from] QaError),

    #[error("backend configuration: {0}")]
    Backend(#[from] AiLlmError),
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Question answering over product documents; owns the corpus cache.
    pub pipeline: QaPipeline,
    /// Provider behind the pipeline, reported by `/health`.
    pub backend: LlmProvider,
}

impl AppState {
    pub fn new(pipeline: QaPipeline, backend: LlmProvider) -> Self {
        Self { pipeline, backend }
    }

    /// Load shared state from environment variables.
    ///
    /// See [`QaConfig::from_env`] and
    /// [`config_from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ConfigError> {
        let qa_cfg = QaConfig::from_env()?;
        let backend = QaBackend::new(config_from_env()?)?;
        let provider = backend.provider();

        info!(
            assets_root = %qa_cfg.assets_root.display(),
            max_words = qa_cfg.max_words,
            overlap_sentences = qa_cfg.overlap_sentences,
            cache_ttl_secs = qa_cfg.cache_ttl.as_secs(),
            "pipeline configured"
        );

        let pipeline = QaPipeline::from_config(&qa_cfg, Arc::new(backend));
        Ok(Self::new(pipeline, provider))
    }
}
