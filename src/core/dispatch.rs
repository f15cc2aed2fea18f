//! Tool dispatch for one batch of tool calls.

use std::sync::Arc;

use uuid::Uuid;

use crate::agent::Agent;
use crate::context::{ContextVariables, CONTEXT_VARIABLES_PARAM};
use crate::error::{Result, SwarmError};
use crate::tools::{validate_arguments, ToolArguments, ToolCallContext, ToolRegistry, ToolResult};
use crate::types::{Message, ToolCall};

/// What one batch of tool calls produced.
#[derive(Debug, Default)]
pub struct Dispatched {
    /// One tool record per call, in call order.
    pub messages: Vec<Message>,
    /// Handoff target; the last one in the batch wins.
    pub agent: Option<Arc<Agent>>,
    /// Context updates of the batch, merged in call order.
    pub context_variables: ContextVariables,
}

/// Execute `tool_calls` sequentially against `registry`.
///
/// Every tool sees `context_variables` as it was when the batch started.
/// Unknown tool names produce an error record and the batch continues; any
/// other failure aborts.
pub async fn handle_tool_calls(
    tool_calls: &[ToolCall],
    registry: &ToolRegistry,
    context_variables: &ContextVariables,
    run_id: Uuid,
    debug: bool,
) -> Result<Dispatched> {
    let mut out = Dispatched::default();
    let mut handoffs = 0usize;

    for call in tool_calls {
        let name = call.name();

        let Some(entry) = registry.get(name) else {
            let err = SwarmError::UnresolvedTool(name.to_string());
            if debug {
                tracing::debug!(%run_id, tool = name, "tool not found");
            }
            out.messages.push(Message::tool_result(
                &call.id,
                name,
                format!("Error: {err}"),
            ));
            continue;
        };

        let mut args = ToolArguments::parse(&call.function.arguments)?;
        args.remove(CONTEXT_VARIABLES_PARAM);
        validate_arguments(entry.tool.signature(), &args)
            .map_err(|reason| SwarmError::InvalidArgument(format!("{name}: {reason}")))?;

        if debug {
            tracing::debug!(
                %run_id,
                tool = name,
                tool_call_id = %call.id,
                arguments = %call.function.arguments,
                "calling tool"
            );
        }

        let ctx = ToolCallContext {
            tool_call_id: call.id.clone(),
            tool_name: name.to_string(),
            context_variables: if entry.wants_context_variables {
                context_variables.clone()
            } else {
                ContextVariables::new()
            },
        };

        let output = entry.tool.call(&args, &ctx).await.map_err(|err| match err {
            err @ SwarmError::ToolExecution { .. } => err,
            other => SwarmError::tool(name, other.to_string()),
        })?;
        let result = ToolResult::from_output(name, output)?;

        out.messages
            .push(Message::tool_result(&call.id, name, result.value));
        out.context_variables.merge(&result.context_variables);
        if let Some(agent) = result.agent {
            handoffs += 1;
            out.agent = Some(agent);
        }
    }

    if handoffs > 1 {
        if let Some(ref agent) = out.agent {
            tracing::warn!(
                %run_id,
                handoffs,
                agent = agent.name(),
                "multiple handoffs in one batch; using the last"
            );
        }
    }

    Ok(out)
}
