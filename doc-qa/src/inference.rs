//! Seam between the pipeline and whatever answers a single window.

use async_trait::async_trait;

pub use ai_llm_service::AnswerScoring;
use ai_llm_service::QaBackend;

use crate::{answer::AnswerCandidate, error::InferenceError};

/// Answers a question against one context string.
#[async_trait]
pub trait Inference: Send + Sync {
    /// How candidates produced by this backend are compared.
    fn scoring(&self) -> AnswerScoring;

    async fn infer(&self, question: &str, context: &str) -> Result<AnswerCandidate, InferenceError>;
}

#[async_trait]
impl Inference for QaBackend {
    fn scoring(&self) -> AnswerScoring {
        QaBackend::scoring(self)
    }

    async fn infer(&self, question: &str, context: &str) -> Result<AnswerCandidate, InferenceError> {
        let answer = self.answer(question, context).await?;
        Ok(AnswerCandidate {
            text: answer.text,
            score: answer.score,
            start: answer.start,
            end: answer.end,
        })
    }
}
