//! Question-answering backend selected once at startup.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - One variant per provider; every variant answers `(question, context)`.
//! - [`QaBackend::scoring`] tells callers how to compare answers coming from
//!   this backend.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{config::default_config::config_from_env, qa_backend::QaBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(QaBackend::new(config_from_env()?)?);
//!     let answer = backend.answer("What are cats?", "Cats are mammals.").await?;
//!     println!("{} ({:?})", answer.text, answer.score);
//!     Ok(())
//! }
//! ```

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{hf_qa_service::HfQaService, ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// How answers from a backend should be ranked against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerScoring {
    /// The backend reports a confidence; higher is better.
    Confidence,
    /// No confidence available; the longer text is preferred.
    TextLength,
}

/// One answer for one context.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendAnswer {
    /// Answer text.
    pub text: String,
    /// Confidence reported by scored backends.
    pub score: Option<f32>,
    /// Character offset of the answer in the context (extractive only).
    pub start: Option<usize>,
    /// Character offset where the answer ends (extractive only).
    pub end: Option<usize>,
}

impl BackendAnswer {
    /// Answer without a score or span.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            start: None,
            end: None,
        }
    }
}

/// The configured backend.
#[derive(Debug)]
pub enum QaBackend {
    /// Extractive model with confidence scores.
    Extractive(HfQaService),
    /// OpenAI chat completions.
    OpenAi(OpenAiService),
    /// Ollama generation.
    Ollama(OllamaService),
}

impl QaBackend {
    /// Builds the client matching `cfg.provider`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the config is invalid or the HTTP client
    /// cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        cfg.validate()?;
        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            "question-answering backend selected"
        );
        Ok(match cfg.provider {
            LlmProvider::HuggingFace => QaBackend::Extractive(HfQaService::new(cfg)?),
            LlmProvider::OpenAI => QaBackend::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => QaBackend::Ollama(OllamaService::new(cfg)?),
        })
    }

    /// Provider behind this backend.
    pub fn provider(&self) -> LlmProvider {
        match self {
            QaBackend::Extractive(_) => LlmProvider::HuggingFace,
            QaBackend::OpenAi(_) => LlmProvider::OpenAI,
            QaBackend::Ollama(_) => LlmProvider::Ollama,
        }
    }

    /// Ranking policy for answers produced by this backend.
    pub fn scoring(&self) -> AnswerScoring {
        if self.provider().is_scored() {
            AnswerScoring::Confidence
        } else {
            AnswerScoring::TextLength
        }
    }

    /// Answers `question` using only `context`.
    ///
    /// # Errors
    /// Propagates transport, status and decoding errors from the provider.
    pub async fn answer(&self, question: &str, context: &str) -> Result<BackendAnswer, AiLlmError> {
        match self {
            QaBackend::Extractive(svc) => {
                let a = svc.answer(question, context).await?;
                Ok(BackendAnswer {
                    text: a.answer,
                    score: Some(a.score),
                    start: a.start,
                    end: a.end,
                })
            }
            QaBackend::OpenAi(svc) => svc.answer(question, context).await.map(BackendAnswer::free_text),
            QaBackend::Ollama(svc) => svc.answer(question, context).await.map(BackendAnswer::free_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "m".into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("k".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn scoring_follows_provider() {
        let hf = QaBackend::new(cfg(LlmProvider::HuggingFace)).unwrap();
        assert_eq!(hf.scoring(), AnswerScoring::Confidence);
        assert_eq!(hf.provider(), LlmProvider::HuggingFace);

        let chat = QaBackend::new(cfg(LlmProvider::OpenAI)).unwrap();
        assert_eq!(chat.scoring(), AnswerScoring::TextLength);

        let local = QaBackend::new(cfg(LlmProvider::Ollama)).unwrap();
        assert_eq!(local.scoring(), AnswerScoring::TextLength);
    }

    #[test]
    fn invalid_config_is_rejected_before_building_clients() {
        let mut c = cfg(LlmProvider::HuggingFace);
        c.endpoint = "ftp://nope".into();
        assert!(matches!(QaBackend::new(c), Err(AiLlmError::Config(_))));
    }
}
