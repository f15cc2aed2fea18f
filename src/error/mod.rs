//! Error types for Swarm.

use thiserror::Error;

/// Primary error type for all Swarm operations.
///
/// Only [`SwarmError::UnresolvedTool`] is recoverable: the executor renders it
/// into the conversation as a tool message and keeps going. Every other
/// variant aborts the run.
#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to extract schema for function '{function}': {reason}")]
    SchemaExtraction { function: String, reason: String },

    #[error("Malformed stream delta: {0}")]
    MalformedDelta(String),

    #[error("Tool {0} not found.")]
    UnresolvedTool(String),

    #[error("Invalid result from tool '{tool_name}': cannot cast {value} to a string; tools must return a value, an agent, or a result")]
    InvalidToolResult { tool_name: String, value: String },

    #[error("Tool execution error in {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),
}

impl SwarmError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a schema extraction error for the named function.
    pub fn schema(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaExtraction {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Whether the run can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedTool(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SwarmError>;
