//! Tool return values and their normalization into a result envelope.

use std::sync::Arc;

use crate::agent::Agent;
use crate::context::ContextVariables;
use crate::error::{Result, SwarmError};

/// What a tool may return.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    /// A plain value, surfaced to the model as its string form.
    Value(serde_json::Value),
    /// Hand the conversation to another agent.
    Agent(Arc<Agent>),
    /// A fully specified result.
    Result(ToolResult),
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::Value(serde_json::Value::String(value))
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::Value(serde_json::Value::String(value.to_string()))
    }
}

/// No output; the model receives an empty tool record.
impl From<()> for ToolOutput {
    fn from(_: ()) -> Self {
        Self::Value(serde_json::Value::String(String::new()))
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl From<Arc<Agent>> for ToolOutput {
    fn from(agent: Arc<Agent>) -> Self {
        Self::Agent(agent)
    }
}

impl From<ToolResult> for ToolOutput {
    fn from(result: ToolResult) -> Self {
        Self::Result(result)
    }
}

/// Uniform envelope produced for every tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolResult {
    /// Content returned to the model.
    pub value: String,
    /// Agent to hand off to, if any.
    pub agent: Option<Arc<Agent>>,
    /// Keys to merge into the run's context variables.
    pub context_variables: ContextVariables,
}

impl ToolResult {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_agent(mut self, agent: Arc<Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn with_context_variables(mut self, context_variables: ContextVariables) -> Self {
        self.context_variables = context_variables;
        self
    }

    /// Normalize whatever `tool_name` returned into an envelope.
    pub fn from_output(tool_name: &str, output: ToolOutput) -> Result<Self> {
        match output {
            ToolOutput::Result(result) => Ok(result),
            ToolOutput::Agent(agent) => Ok(Self {
                value: serde_json::json!({ "assistant": agent.name() }).to_string(),
                agent: Some(agent),
                context_variables: ContextVariables::new(),
            }),
            ToolOutput::Value(serde_json::Value::String(value)) => Ok(Self::new(value)),
            ToolOutput::Value(serde_json::Value::Null) => Err(SwarmError::InvalidToolResult {
                tool_name: tool_name.to_string(),
                value: "null".to_string(),
            }),
            ToolOutput::Value(other) => Ok(Self::new(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        let result = ToolResult::from_output("t", "sunny".into()).unwrap();
        assert_eq!(result.value, "sunny");
        assert!(result.agent.is_none());
        assert!(result.context_variables.is_empty());
    }

    #[test]
    fn unit_is_empty_output() {
        let result = ToolResult::from_output("notify", ().into()).unwrap();
        assert_eq!(result.value, "");
        assert!(result.agent.is_none());
    }

    #[test]
    fn structured_values_become_json_text() {
        let result = ToolResult::from_output("t", json!({"temp": 67}).into()).unwrap();
        assert_eq!(result.value, r#"{"temp":67}"#);
        assert_eq!(ToolResult::from_output("t", json!(42).into()).unwrap().value, "42");
        assert_eq!(ToolResult::from_output("t", json!(true).into()).unwrap().value, "true");
    }

    #[test]
    fn agent_becomes_handoff_envelope() {
        let sales = Arc::new(Agent::new("Sales Agent"));
        let result = ToolResult::from_output("transfer_to_sales", sales.clone().into()).unwrap();

        let content: serde_json::Value = serde_json::from_str(&result.value).unwrap();
        assert_eq!(content, json!({"assistant": "Sales Agent"}));
        assert!(Agent::same(result.agent.as_ref().unwrap(), &sales));
    }

    #[test]
    fn envelope_is_kept_verbatim() {
        let vars = ContextVariables::new().with("tier", "gold");
        let result = ToolResult::from_output(
            "upgrade",
            ToolResult::new("upgraded").with_context_variables(vars.clone()).into(),
        )
        .unwrap();
        assert_eq!(result.value, "upgraded");
        assert_eq!(result.context_variables, vars);
    }

    #[test]
    fn null_is_not_coercible() {
        let err = ToolResult::from_output("noop", ToolOutput::Value(serde_json::Value::Null)).unwrap_err();
        assert!(matches!(err, SwarmError::InvalidToolResult { ref tool_name, .. } if tool_name == "noop"));
    }
}
