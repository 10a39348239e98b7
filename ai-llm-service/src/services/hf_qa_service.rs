//! Extractive question-answering client (HuggingFace inference protocol).
//!
//! Endpoint derived from `LlmModelConfig`:
//! - POST {endpoint}/models/{model}: `{"inputs": {"question", "context"}}`
//!
//! The model returns the answer span it extracted from the context together
//! with a confidence score. Some deployments wrap the object in a
//! single-element array; both shapes are accepted.
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::HuggingFace`
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Answer extracted by the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedAnswer {
    /// Answer text (a substring of the context).
    pub answer: String,
    /// Model confidence, usually in `0.0..=1.0`.
    pub score: f32,
    /// Character offset where the answer starts in the context.
    #[serde(default)]
    pub start: Option<usize>,
    /// Character offset where the answer ends in the context.
    #[serde(default)]
    pub end: Option<usize>,
}

/// Thin client for an extractive QA model.
#[derive(Debug)]
pub struct HfQaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_answer: String,
}

impl HfQaService {
    /// Creates a new [`HfQaService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not HuggingFace
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::HuggingFace {
            return Err(ProviderError::new(
                LlmProvider::HuggingFace,
                ProviderErrorKind::InvalidProvider,
            )
            .into());
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                LlmProvider::HuggingFace,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        if let Some(token) = cfg.api_key.as_deref() {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ProviderError::new(
                    LlmProvider::HuggingFace,
                    ProviderErrorKind::Decode(format!("invalid API token header: {e}")),
                )
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_answer = format!(
            "{}/models/{}",
            endpoint.trim_end_matches('/'),
            cfg.model.trim_matches('/')
        );

        Ok(Self {
            client,
            cfg,
            url_answer,
        })
    }

    /// Asks the model to extract an answer to `question` from `context`.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    pub async fn answer(&self, question: &str, context: &str) -> Result<ExtractedAnswer, AiLlmError> {
        let started = Instant::now();
        let body = QaRequest {
            inputs: QaInputs { question, context },
        };

        debug!(
            model = %self.cfg.model,
            context_len = context.len(),
            "POST {}", self.url_answer
        );

        let resp = self.client.post(&self.url_answer).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_answer.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "question-answering endpoint returned non-success status"
            );

            return Err(ProviderError::new(
                LlmProvider::HuggingFace,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let raw = resp.text().await?;
        let answer = decode_answer(&raw)?;

        debug!(
            model = %self.cfg.model,
            score = answer.score,
            latency_ms = started.elapsed().as_millis(),
            "extractive answer received"
        );

        Ok(answer)
    }
}

/// Parses either `{...}` or `[{...}]` into an [`ExtractedAnswer`].
fn decode_answer(raw: &str) -> Result<ExtractedAnswer, AiLlmError> {
    let parsed: QaResponse = serde_json::from_str(raw).map_err(|e| {
        ProviderError::new(
            LlmProvider::HuggingFace,
            ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `{{ answer, score, start, end }}`"
            )),
        )
    })?;

    match parsed {
        QaResponse::Single(a) => Ok(a),
        QaResponse::Many(list) => list.into_iter().next().ok_or_else(|| {
            ProviderError::new(LlmProvider::HuggingFace, ProviderErrorKind::EmptyChoices).into()
        }),
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Debug, Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaResponse {
    Single(ExtractedAnswer),
    Many(Vec<ExtractedAnswer>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::HuggingFace,
            model: "distilbert-base-cased-distilled-squad".into(),
            endpoint: "http://localhost:8000/".into(),
            api_key: Some("hf_token".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn decodes_object_and_array_shapes() {
        let one = decode_answer(r#"{"answer":"mammals","score":0.93,"start":9,"end":16}"#).unwrap();
        assert_eq!(one.answer, "mammals");
        assert_eq!(one.start, Some(9));

        let many = decode_answer(r#"[{"answer":"a","score":0.5},{"answer":"b","score":0.4}]"#)
            .unwrap();
        assert_eq!(many.answer, "a");
        assert_eq!(many.end, None);
    }

    #[test]
    fn empty_array_and_garbage_are_errors() {
        assert!(matches!(
            decode_answer("[]"),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            }))
        ));
        assert!(matches!(
            decode_answer(r#"{"error":"model loading"}"#),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Decode(_),
                ..
            }))
        ));
    }

    #[test]
    fn builds_model_url() {
        let svc = HfQaService::new(cfg()).unwrap();
        assert_eq!(
            svc.url_answer,
            "http://localhost:8000/models/distilbert-base-cased-distilled-squad"
        );
    }

    #[test]
    fn rejects_foreign_provider() {
        let mut c = cfg();
        c.provider = LlmProvider::Ollama;
        assert!(HfQaService::new(c).is_err());
    }
}
