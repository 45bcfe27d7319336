//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on input patterns.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::error::Result;
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Used for unit testing without a running Ollama daemon.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response), checked in order.
    custom_responses: Vec<(String, String)>,
    /// Models reported by `list_models`.
    models: Vec<String>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self {
            custom_responses: Vec::new(),
            models: vec!["mock:latest".to_string()],
        }
    }

    /// Adds a custom response mapping.
    ///
    /// When the last user message contains `pattern`, the mock returns
    /// `response`. Patterns added later win over the defaults but earlier
    /// custom patterns take precedence.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Overrides the reported model list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // The SQL-translation template embeds the operator's request on its
        // first line; the rest is fixed instruction text with its own example
        // queries. Match the defaults against the first line only, so the
        // examples never trigger them.
        let request_line = input_lower.lines().next().unwrap_or("");

        if request_line.contains("primeros 10") || request_line.contains("first 10") {
            return "SELECT * FROM armada_database.armada LIMIT 10;".to_string();
        }

        if request_line.contains("caudal promedio") || request_line.contains("average")
        {
            return "SELECT muellenum, AVG(caudal) AS caudal_promedio FROM armada GROUP BY muellenum;"
                .to_string();
        }

        if request_line.contains("presion") || request_line.contains("pressure") {
            return "SELECT tiempo, caudal, presion FROM armada ORDER BY tiempo;".to_string();
        }

        "I can answer questions about the fuel-supply telemetry. Ask me for a query."
            .to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.models.clone())
    }

    async fn complete_stream(
        &self,
        _model: &str,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let response = self.mock_response(&Self::extract_user_input(messages));

        // Simulate streaming by yielding chunks
        let chunks: Vec<String> = response
            .chars()
            .collect::<Vec<_>>()
            .chunks(10)
            .map(|c| c.iter().collect())
            .collect();

        let stream = stream::iter(chunks.into_iter().map(Ok));
        Ok(stream.boxed())
    }
}
