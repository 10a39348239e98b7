use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used to answer a question over a context.
///
/// The provider decides both the wire protocol and the kind of answer that
/// comes back:
///
/// - [`LlmProvider::HuggingFace`] runs an extractive question-answering model
///   and reports a confidence score together with the answer span.
/// - [`LlmProvider::OpenAI`] and [`LlmProvider::Ollama`] generate free text
///   with no explicit confidence.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let provider: LlmProvider = "chatgpt".parse().unwrap();
/// assert_eq!(provider, LlmProvider::OpenAI);
/// assert!(!provider.is_scored());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Extractive QA over the HuggingFace inference protocol.
    HuggingFace,
    /// OpenAI chat completions API.
    OpenAI,
    /// Local Ollama runtime.
    Ollama,
}

impl LlmProvider {
    /// Returns `true` when answers from this provider carry a confidence score.
    pub fn is_scored(self) -> bool {
        matches!(self, LlmProvider::HuggingFace)
    }

    /// Stable lowercase name, as accepted by `LLM_KIND`.
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::HuggingFace => "huggingface",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(LlmProvider::HuggingFace),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("HF".parse::<LlmProvider>().unwrap(), LlmProvider::HuggingFace);
        assert_eq!(" OpenAI ".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "anthropic".parse::<LlmProvider>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProvider(ref p) if p == "anthropic"));
    }

    #[test]
    fn only_extractive_provider_is_scored() {
        assert!(LlmProvider::HuggingFace.is_scored());
        assert!(!LlmProvider::OpenAI.is_scored());
        assert!(!LlmProvider::Ollama.is_scored());
    }
}
