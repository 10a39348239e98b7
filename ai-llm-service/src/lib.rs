//! Question-answering backends for product documentation.
//!
//! One [`qa_backend::QaBackend`] is chosen from configuration at startup and
//! answers a question over a single context window. Extractive backends
//! report a confidence score; chat backends return free text.

pub mod config;
pub mod error_handler;
pub mod prompt;
pub mod qa_backend;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use qa_backend::{AnswerScoring, BackendAnswer, QaBackend};
