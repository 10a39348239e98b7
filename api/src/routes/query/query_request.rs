use doc_qa::AnswerCandidate;
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// Request payload for /query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question.
    pub question: String,
    /// Directory name of the product under the assets root.
    pub product_id: String,
}

impl QueryRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.question.trim().is_empty() {
            return Err(AppError::BadRequest("`question` must not be blank".into()));
        }
        if self.product_id.trim().is_empty() {
            return Err(AppError::BadRequest("`product_id` must not be blank".into()));
        }
        Ok(())
    }
}

/// Response payload for /query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Confidence, only for scored backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Character span of the answer inside the winning window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl From<AnswerCandidate> for QueryResponse {
    fn from(c: AnswerCandidate) -> Self {
        Self {
            answer: c.text,
            score: c.score,
            start: c.start,
            end: c.end,
        }
    }
}
