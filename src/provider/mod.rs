//! Chat-completion provider trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::agent::ToolChoice;
use crate::error::Result;
use crate::tools::ToolSchema;
use crate::types::{AssistantMessage, CompletionChunk, Message};

/// One chat-completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// Full prompt, starting with the system message.
    pub messages: Vec<Message>,
    /// Advertised tools; `None` when the agent has none.
    pub tools: Option<Vec<ToolSchema>>,
    pub tool_choice: Option<ToolChoice>,
    /// Only set when tools are advertised.
    pub parallel_tool_calls: Option<bool>,
    pub stream: bool,
}

/// The completion endpoint the executor talks to.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g. "openai").
    fn provider_name(&self) -> &str;

    /// Request one complete assistant message.
    async fn complete(&self, request: &CompletionRequest) -> Result<AssistantMessage>;

    /// Request the assistant message as a stream of deltas.
    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<CompletionChunk>>>;
}

#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;
