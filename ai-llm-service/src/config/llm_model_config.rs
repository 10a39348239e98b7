use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32},
};

/// Configuration for a question-answering backend.
///
/// One struct covers every provider; fields that a provider does not use are
/// simply ignored by its client (e.g. `temperature` for extractive QA).
///
/// # Fields
///
/// - `provider`: Which backend to use (HuggingFace, OpenAI, Ollama).
/// - `model`: The model identifier (e.g. `"gpt-3.5-turbo"`).
/// - `endpoint`: Base URL of the inference server, without a path.
/// - `api_key`: Optional bearer token.
/// - `max_tokens`: Maximum number of tokens to generate (chat providers).
/// - `temperature`: Sampling temperature (chat providers).
/// - `top_p`: Nucleus sampling cutoff (chat providers).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-3.5-turbo".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(256),
///     temperature: Some(0.7),
///     top_p: None,
///     timeout_secs: Some(30),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend provider.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the invariants every client relies on.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] if `model` is blank
    /// - [`ConfigError::InvalidFormat`] if `endpoint` is not http(s)
    /// - [`ConfigError::OutOfRange`] for `temperature` outside `0.0..=2.0`
    ///   or `top_p` outside `0.0..=1.0`
    /// - [`ConfigError::MissingVar`] if OpenAI is selected without an API key
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", self.endpoint.trim())?;
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        if self.provider == LlmProvider::OpenAI
            && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;

    fn hf() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::HuggingFace,
            model: "deepset/roberta-base-squad2".into(),
            endpoint: "http://localhost:8000".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(10),
        }
    }

    #[test]
    fn accepts_minimal_extractive_config() {
        assert!(hf().validate().is_ok());
    }

    #[test]
    fn rejects_blank_model_and_bad_endpoint() {
        let mut cfg = hf();
        cfg.model = "  ".into();
        assert!(matches!(
            cfg.validate(),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));

        let mut cfg = hf();
        cfg.endpoint = "localhost:8000".into();
        assert!(matches!(
            cfg.validate(),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn openai_requires_api_key() {
        let mut cfg = hf();
        cfg.provider = LlmProvider::OpenAI;
        assert!(matches!(
            cfg.validate(),
            Err(AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY")))
        ));
        cfg.api_key = Some("sk-test".into());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn temperature_must_be_in_range() {
        let mut cfg = hf();
        cfg.temperature = Some(3.5);
        assert!(matches!(
            cfg.validate(),
            Err(AiLlmError::Config(ConfigError::OutOfRange { field: "temperature", .. }))
        ));
    }
}
