//! Agent persona: instructions, model, and callable tools.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};

use crate::context::ContextVariables;
use crate::error::Result;
use crate::tools::{FunctionSignature, FunctionTool, Tool, ToolArguments, ToolCallContext, ToolOutput};

const DEFAULT_AGENT_NAME: &str = "Agent";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_INSTRUCTIONS: &str = "You are a helpful agent.";

type InstructionsFn = dyn Fn(&ContextVariables) -> String + Send + Sync;

/// System prompt of an agent, fixed or computed from the context variables.
#[derive(Clone)]
pub enum Instructions {
    Static(String),
    Dynamic(Arc<InstructionsFn>),
}

impl Instructions {
    /// Build dynamic instructions from a closure.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&ContextVariables) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Produce the system prompt for the current context variables.
    pub fn render(&self, context_variables: &ContextVariables) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Dynamic(f) => f(context_variables),
        }
    }
}

impl From<&str> for Instructions {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Instructions {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Tool selection policy forwarded to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    /// Force a call to the named function.
    Function(String),
}

impl ToolChoice {
    /// Wire representation used by chat-completions requests.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Auto => "auto".into(),
            Self::None => "none".into(),
            Self::Required => "required".into(),
            Self::Function(name) => serde_json::json!({
                "type": "function",
                "function": { "name": name },
            }),
        }
    }
}

/// A named persona the executor can run.
///
/// Agents are shared as `Arc<Agent>`; the active agent of a run is swapped by
/// reference on handoff. Tools can be appended through a shared reference, so
/// agents that hand off to each other can be wired up after construction.
pub struct Agent {
    name: String,
    model: String,
    instructions: Instructions,
    tools: RwLock<Vec<Arc<dyn Tool>>>,
    tool_choice: Option<ToolChoice>,
    parallel_tool_calls: bool,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_NAME)
    }
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: DEFAULT_MODEL.to_string(),
            instructions: Instructions::Static(DEFAULT_INSTRUCTIONS.to_string()),
            tools: RwLock::new(Vec::new()),
            tool_choice: None,
            parallel_tool_calls: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<Instructions>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Instructions computed from the context variables on every request.
    pub fn with_dynamic_instructions<F>(mut self, f: F) -> Self
    where
        F: Fn(&ContextVariables) -> String + Send + Sync + 'static,
    {
        self.instructions = Instructions::dynamic(f);
        self
    }

    pub fn with_tool(self, tool: impl Tool + 'static) -> Self {
        self.add_tool(tool);
        self
    }

    /// Add a closure-backed tool.
    pub fn with_function<F, Fut>(self, signature: FunctionSignature, handler: F) -> Self
    where
        F: Fn(ToolArguments, ToolCallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        self.with_tool(FunctionTool::new(signature, handler))
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_parallel_tool_calls(mut self, enabled: bool) -> Self {
        self.parallel_tool_calls = enabled;
        self
    }

    /// Append a tool, e.g. a handoff registered after both agents exist.
    pub fn add_tool(&self, tool: impl Tool + 'static) {
        self.add_shared_tool(Arc::new(tool));
    }

    pub fn add_shared_tool(&self, tool: Arc<dyn Tool>) {
        self.tools
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tool);
    }

    /// Append a closure-backed tool through a shared reference.
    pub fn add_function<F, Fut>(&self, signature: FunctionSignature, handler: F)
    where
        F: Fn(ToolArguments, ToolCallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        self.add_tool(FunctionTool::new(signature, handler));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instructions(&self) -> &Instructions {
        &self.instructions
    }

    /// Snapshot of the tool list in registration order.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn tool_choice(&self) -> Option<&ToolChoice> {
        self.tool_choice.as_ref()
    }

    pub fn parallel_tool_calls(&self) -> bool {
        self.parallel_tool_calls
    }

    /// Whether two handles refer to the same agent.
    pub fn same(a: &Arc<Agent>, b: &Arc<Agent>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tool_names: Vec<String> = self.tools().iter().map(|t| t.name().to_string()).collect();
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("instructions", &self.instructions)
            .field("tools", &tool_names)
            .field("tool_choice", &self.tool_choice)
            .field("parallel_tool_calls", &self.parallel_tool_calls)
            .finish()
    }
}
