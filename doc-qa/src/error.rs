//! Typed error for the doc-qa crate.

use std::path::PathBuf;

use thiserror::Error;

/// Externally visible failure class.
///
/// Callers only ever see two tiers: a missing product, or an opaque
/// processing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ProcessingFailure,
}

#[derive(Debug, Error)]
pub enum QaError {
    /// The product has no backing directory under the assets root.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Listing or reading corpus files failed (includes invalid UTF-8).
    #[error("failed to read corpus at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inference backend failed for one of the windows.
    #[error("inference failed on segment {segment}: {source}")]
    Inference {
        segment: usize,
        #[source]
        source: InferenceError,
    },

    /// The reducer was handed no candidates.
    #[error("no answer candidates to choose from")]
    EmptyInput,

    /// Invalid runtime configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl QaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QaError::ProductNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::ProcessingFailure,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QaError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error reported by an [`Inference`](crate::inference::Inference) backend.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InferenceError(Box<dyn std::error::Error + Send + Sync>);

impl InferenceError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }

    /// Error from a plain message, handy for stub backends.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }
}

impl From<ai_llm_service::AiLlmError> for InferenceError {
    fn from(err: ai_llm_service::AiLlmError) -> Self {
        Self::new(err)
    }
}
