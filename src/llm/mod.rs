//! LLM integration for dockside.
//!
//! Provides the client trait and implementations for the Ollama daemon plus a
//! deterministic mock for tests.

pub mod mock;
pub mod ollama;
pub mod prompt;
pub mod types;

pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use prompt::PromptBuilder;
pub use types::{Message, Role};

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::str::FromStr;

use crate::error::Result;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Lists the model identifiers available from the provider.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Generates a streaming completion for the given messages with the given
    /// model.
    ///
    /// Returns a lazy, finite stream of reply fragments; their concatenation is
    /// the full reply. The stream is not restartable.
    async fn complete_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Local Ollama instance.
    #[default]
    Ollama,
    /// Mock client for testing (no daemon required).
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {s}")),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Picks the session model from the discovered list.
///
/// Precedence: an explicit request (CLI flag) if it is in the list, then the
/// configured preference if it is in the list, then the first discovered model.
pub fn select_model(
    available: &[String],
    requested: Option<&str>,
    preferred: &str,
) -> Result<String> {
    if available.is_empty() {
        return Err(crate::error::DocksideError::llm(
            "No models available. Pull one first: ollama pull llama3.2:3b",
        ));
    }

    if let Some(requested) = requested {
        if available.iter().any(|m| m == requested) {
            return Ok(requested.to_string());
        }
        return Err(crate::error::DocksideError::llm(format!(
            "Model '{requested}' is not available. Discovered: {}",
            available.join(", ")
        )));
    }

    if available.iter().any(|m| m == preferred) {
        return Ok(preferred.to_string());
    }

    Ok(available[0].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert_eq!("Ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert_eq!("mock".parse::<LlmProvider>().unwrap(), LlmProvider::Mock);
        assert!("openai".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(format!("{}", LlmProvider::Ollama), "ollama");
        assert_eq!(format!("{}", LlmProvider::Mock), "mock");
    }

    #[test]
    fn test_select_model_prefers_explicit_request() {
        let available = models(&["llama3.2:3b", "qwen2.5-coder:7b"]);
        let picked = select_model(&available, Some("qwen2.5-coder:7b"), "llama3.2:3b").unwrap();
        assert_eq!(picked, "qwen2.5-coder:7b");
    }

    #[test]
    fn test_select_model_rejects_unknown_request() {
        let available = models(&["llama3.2:3b"]);
        let err = select_model(&available, Some("gpt-4"), "llama3.2:3b").unwrap_err();
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_select_model_falls_back_to_preference() {
        let available = models(&["mistral:7b", "llama3.2:3b"]);
        let picked = select_model(&available, None, "llama3.2:3b").unwrap();
        assert_eq!(picked, "llama3.2:3b");
    }

    #[test]
    fn test_select_model_falls_back_to_first_discovered() {
        let available = models(&["mistral:7b", "phi3:mini"]);
        let picked = select_model(&available, None, "llama3.2:3b").unwrap();
        assert_eq!(picked, "mistral:7b");
    }

    #[test]
    fn test_select_model_empty_list_is_error() {
        let err = select_model(&[], None, "llama3.2:3b").unwrap_err();
        assert!(err.to_string().contains("No models available"));
    }
}
