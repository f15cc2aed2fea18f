//! Convenience re-exports for common use.

pub use crate::agent::{Agent, Instructions, ToolChoice};
pub use crate::config::SwarmConfig;
pub use crate::context::ContextVariables;
pub use crate::core::{Response, RunOptions, StreamEvent, Swarm, TurnBudget};
pub use crate::error::{Result, SwarmError};
pub use crate::provider::CompletionProvider;
pub use crate::tools::{
    FunctionSignature, FunctionTool, ParamType, Tool, ToolArguments, ToolCallContext,
    ToolOutput, ToolResult,
};
pub use crate::types::{AssistantMessage, Message, Role, ToolCall};
