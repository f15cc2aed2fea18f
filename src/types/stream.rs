//! Streaming completion types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One item of a streamed completion.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionChunk {
    /// A partial assistant message, shaped like the final message with any
    /// field absent. Tool-call fragments carry an integer `index`.
    Delta(serde_json::Value),
    /// The provider finished the message.
    Done { finish_reason: Option<FinishReason> },
}

/// Why the model stopped producing the message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}
