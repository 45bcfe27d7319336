//! Ollama LLM client implementation.
//!
//! Implements the LlmClient trait against a local Ollama daemon: model
//! discovery via `/api/tags` and streaming chat via `/api/chat`.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DocksideError, Result};
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default Ollama API URL.
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama client configuration.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Creates a new config with the default URL.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama LLM client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client with the given configuration.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocksideError::llm(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `OLLAMA_URL` for the base URL (defaults to http://localhost:11434).
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        Self::new(OllamaConfig::new().with_url(base_url))
    }

    /// Converts internal messages to Ollama API format.
    fn convert_messages(messages: &[Message]) -> Vec<OllamaMessage> {
        messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Returns the chat API endpoint URL.
    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url)
    }

    /// Returns the tags (model listing) API endpoint URL.
    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.base_url)
    }

    /// Maps a reqwest error to a user-actionable LLM error.
    fn map_request_error(e: reqwest::Error) -> DocksideError {
        if e.is_timeout() {
            DocksideError::llm("Request timed out. Try again.")
        } else if e.is_connect() {
            DocksideError::llm("Failed to connect to Ollama. Is it running? Try: ollama serve")
        } else {
            DocksideError::llm(format!("Request failed: {e}"))
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.tags_url())
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DocksideError::llm(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(DocksideError::llm(format!(
                "Ollama API error ({status}): {body}"
            )));
        }

        let tags: OllamaTagsResponse = serde_json::from_str(&body)
            .map_err(|e| DocksideError::llm(format!("Failed to parse model list: {e}")))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn complete_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let request = OllamaRequest {
            model: model.to_string(),
            messages: Self::convert_messages(messages),
            stream: true,
        };

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocksideError::llm(format!(
                "Ollama API error ({status}): {body}"
            )));
        }

        let stream = response.bytes_stream();

        let parsed_stream = stream
            .map(|chunk| {
                chunk
                    .map_err(|e| DocksideError::llm(format!("Stream error: {e}")))
                    .and_then(|bytes| {
                        let text = String::from_utf8_lossy(&bytes);
                        parse_stream_chunk(&text)
                    })
            })
            .filter_map(|result| async move {
                match result {
                    Ok(Some(content)) => Some(Ok(content)),
                    Ok(None) => None,
                    Err(e) => Some(Err(e)),
                }
            });

        Ok(parsed_stream.boxed())
    }
}

/// Parses a streaming chunk from the Ollama API.
///
/// A chunk may contain several newline-delimited JSON events; their message
/// contents are concatenated into one fragment.
fn parse_stream_chunk(chunk: &str) -> Result<Option<String>> {
    let mut content = String::new();

    for line in chunk.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Ok(event) = serde_json::from_str::<OllamaStreamEvent>(line) {
            content.push_str(&event.message.content);
        }
    }

    Ok(if content.is_empty() {
        None
    } else {
        Some(content)
    })
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaStreamEvent {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}
