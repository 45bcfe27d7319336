//! Error types for dockside.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for dockside operations.
///
/// Every variant is non-fatal to the chat session: the orchestrator converts
/// errors into user-visible messages and returns to the prompt.
#[derive(Error, Debug)]
pub enum DocksideError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, unknown columns, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// LLM API errors (unreachable daemon, timeouts, bad responses, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Chart selection errors (wrong column count, non-numeric values, etc.)
    #[error("Chart error: {0}")]
    Chart(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocksideError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a chart error with the given message.
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Chart(_) => "Chart Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using DocksideError.
pub type Result<T> = std::result::Result<T, DocksideError>;
