//! Building one completion request for the active agent.

use crate::agent::Agent;
use crate::context::ContextVariables;
use crate::error::Result;
use crate::provider::CompletionRequest;
use crate::tools::ToolRegistry;
use crate::types::Message;

/// Build the request for the active agent and the registry it advertises.
///
/// The system message comes first, rendered from the agent's instructions
/// against the current context variables, followed by the whole history.
/// The registry is a snapshot of the agent's tools at this point of the run.
pub fn build_request(
    agent: &Agent,
    history: &[Message],
    context_variables: &ContextVariables,
    model_override: Option<&str>,
    stream: bool,
) -> Result<(CompletionRequest, ToolRegistry)> {
    let registry = ToolRegistry::build(&agent.tools())?;

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(
        agent.instructions().render(context_variables),
    ));
    messages.extend(history.iter().cloned());

    let has_tools = !registry.is_empty();
    let request = CompletionRequest {
        model: model_override.unwrap_or(agent.model()).to_string(),
        messages,
        tools: has_tools.then(|| registry.schemas()),
        tool_choice: agent.tool_choice().cloned(),
        parallel_tool_calls: has_tools.then_some(agent.parallel_tool_calls()),
        stream,
    };
    Ok((request, registry))
}
