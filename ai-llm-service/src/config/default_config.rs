//! Backend configs loaded from environment variables.
//!
//! [`config_from_env`] picks the provider from `LLM_KIND` and builds a
//! validated [`LlmModelConfig`] for it. Defaults mirror the public endpoints
//! of each provider so that only secrets need to be supplied in most setups.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = `huggingface` (default) | `hf` | `openai` | `chatgpt` | `ollama`
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = request timeout, default 60
//! - `LLM_TEMPERATURE`  = optional sampling temperature
//!
//! HuggingFace (extractive QA):
//! - `HF_ENDPOINT`  = default `https://api-inference.huggingface.co`
//! - `HF_MODEL`     = default `bert-large-uncased-whole-word-masking-finetuned-squad`
//! - `HF_API_TOKEN` = optional bearer token
//!
//! OpenAI:
//! - `OPENAI_ENDPOINT` = default `https://api.openai.com`
//! - `OPENAI_MODEL`    = default `gpt-3.5-turbo`
//! - `OPENAI_API_KEY`  = required
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, Result, must_var, opt_f32, opt_u32, opt_u64, opt_var},
};

pub const DEFAULT_HF_ENDPOINT: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_MODEL: &str = "bert-large-uncased-whole-word-masking-finetuned-squad";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Builds the backend config from the process environment.
///
/// # Errors
/// Any [`ConfigError`] raised while reading or validating the variables.
pub fn config_from_env() -> Result<LlmModelConfig> {
    config_from_lookup(&|k: &str| std::env::var(k).ok())
}

/// Same as [`config_from_env`] but reads variables through `lookup`.
pub fn config_from_lookup<F>(lookup: &F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match opt_var(lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::HuggingFace,
    };

    let max_tokens = opt_u32(lookup, "LLM_MAX_TOKENS")?;
    let temperature = opt_f32(lookup, "LLM_TEMPERATURE")?;
    let timeout_secs = opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    let cfg = match provider {
        LlmProvider::HuggingFace => LlmModelConfig {
            provider,
            model: opt_var(lookup, "HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.into()),
            endpoint: opt_var(lookup, "HF_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_HF_ENDPOINT.into()),
            api_key: opt_var(lookup, "HF_API_TOKEN"),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(timeout_secs),
        },
        LlmProvider::OpenAI => LlmModelConfig {
            provider,
            model: opt_var(lookup, "OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            endpoint: opt_var(lookup, "OPENAI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.into()),
            api_key: Some(must_var(lookup, "OPENAI_API_KEY")?),
            max_tokens,
            temperature,
            top_p: None,
            timeout_secs: Some(timeout_secs),
        },
        LlmProvider::Ollama => LlmModelConfig {
            provider,
            model: must_var(lookup, "OLLAMA_MODEL")?,
            endpoint: ollama_endpoint(lookup)?,
            api_key: None,
            max_tokens,
            temperature,
            top_p: None,
            timeout_secs: Some(timeout_secs),
        },
    };

    cfg.validate()?;
    Ok(cfg)
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = opt_var(lookup, "OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = opt_var(lookup, "OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_extractive_backend() {
        let cfg = config_from_lookup(&vars(&[])).unwrap();
        assert_eq!(cfg.provider, LlmProvider::HuggingFace);
        assert_eq!(cfg.model, DEFAULT_HF_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_HF_ENDPOINT);
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn openai_needs_key() {
        let err = config_from_lookup(&vars(&[("LLM_KIND", "openai")])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));

        let cfg = config_from_lookup(&vars(&[
            ("LLM_KIND", "chatgpt"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_MAX_TOKENS", "128"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(cfg.max_tokens, Some(128));
    }

    #[test]
    fn ollama_endpoint_from_port() {
        let cfg = config_from_lookup(&vars(&[
            ("LLM_KIND", "ollama"),
            ("OLLAMA_MODEL", "llama3"),
            ("OLLAMA_PORT", "11434"),
        ]))
        .unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:11434");

        let err = config_from_lookup(&vars(&[
            ("LLM_KIND", "ollama"),
            ("OLLAMA_MODEL", "llama3"),
            ("OLLAMA_PORT", "eleven"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::InvalidNumber { var: "OLLAMA_PORT", .. })
        ));
    }

    #[test]
    fn unknown_kind_fails() {
        let err = config_from_lookup(&vars(&[("LLM_KIND", "bard")])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::UnsupportedProvider(_))
        ));
    }
}
