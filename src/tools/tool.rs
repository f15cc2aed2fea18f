//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::result::ToolOutput;
use super::schema::FunctionSignature;
use crate::context::ContextVariables;
use crate::error::Result;

/// Context handed to a tool for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolCallContext {
    /// Id of the tool call being served.
    pub tool_call_id: String,
    /// Tool name as requested by the model.
    pub tool_name: String,
    /// The run's context variables. Empty unless the tool declares the
    /// `context_variables` parameter.
    pub context_variables: ContextVariables,
}

/// A callable an agent can expose to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declared signature; the advertised schema is derived from it.
    fn signature(&self) -> &FunctionSignature;

    /// Tool name (must match what the model calls).
    fn name(&self) -> &str {
        &self.signature().name
    }

    /// Whether the run's context variables are injected on every call.
    fn wants_context_variables(&self) -> bool {
        self.signature().wants_context_variables()
    }

    /// Invoke the tool. An `Err` aborts the run.
    async fn call(&self, args: &ToolArguments, ctx: &ToolCallContext) -> Result<ToolOutput>;
}

type ToolHandler = dyn Fn(ToolArguments, ToolCallContext) -> Pin<Box<dyn Future<Output = Result<ToolOutput>> + Send>>
    + Send
    + Sync;

/// Closure-based tool.
///
/// ```
/// use swarm::tools::{FunctionSignature, FunctionTool, ParamType};
///
/// let weather = FunctionTool::new(
///     FunctionSignature::new("get_weather").param("location", ParamType::Text),
///     |args, _ctx| async move {
///         let location = args.get_str("location")?;
///         Ok(format!("{{\"location\": \"{location}\", \"temp\": 67}}").into())
///     },
/// );
/// ```
pub struct FunctionTool {
    signature: FunctionSignature,
    wants_context: bool,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    /// Wrap a closure with its declared signature.
    pub fn new<F, Fut>(signature: FunctionSignature, handler: F) -> Self
    where
        F: Fn(ToolArguments, ToolCallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        let wants_context = signature.wants_context_variables();
        Self {
            signature,
            wants_context,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn wants_context_variables(&self) -> bool {
        self.wants_context
    }

    async fn call(&self, args: &ToolArguments, ctx: &ToolCallContext) -> Result<ToolOutput> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.signature.name)
            .field("wants_context", &self.wants_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::ParamType;

    #[tokio::test]
    async fn closure_tool_executes() {
        let tool = FunctionTool::new(
            FunctionSignature::new("greet").param("name", ParamType::Text),
            |args, _ctx| async move {
                let name = args.get_str("name")?;
                Ok(format!("Hello, {name}!").into())
            },
        );

        assert_eq!(tool.name(), "greet");
        assert!(!tool.wants_context_variables());

        let args = ToolArguments::parse(r#"{"name": "World"}"#).unwrap();
        let out = tool.call(&args, &ToolCallContext::default()).await.unwrap();
        assert!(matches!(out, ToolOutput::Value(serde_json::Value::String(ref s)) if s == "Hello, World!"));
    }

    #[test]
    fn context_flag_is_read_from_signature() {
        let tool = FunctionTool::new(
            FunctionSignature::new("whoami").context_variables(),
            |_args, ctx| async move { Ok(ctx.context_variables.get_or_default("name").into()) },
        );
        assert!(tool.wants_context_variables());
    }
}
