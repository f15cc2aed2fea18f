//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod result;
pub mod schema;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::{RegisteredTool, ToolRegistry};
pub use result::{ToolOutput, ToolResult};
pub use schema::{function_to_json, FunctionSignature, Param, ParamType, ToolSchema};
pub use tool::{FunctionTool, Tool, ToolCallContext};
pub use validation::validate_arguments;
