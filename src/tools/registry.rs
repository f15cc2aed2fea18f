//! Name-indexed tool registry built from an agent's tool list.

use std::collections::HashMap;
use std::sync::Arc;

use super::schema::{function_to_json, ToolSchema};
use super::tool::Tool;
use crate::error::Result;

/// A tool with the schema advertised for it and its injection flag.
#[derive(Clone)]
pub struct RegisteredTool {
    pub tool: Arc<dyn Tool>,
    /// Schema sent to the model, with the context-variables parameter removed.
    pub schema: ToolSchema,
    pub wants_context_variables: bool,
}

/// Registry resolving model-issued tool names to callables.
///
/// Preserves registration order for schema generation. When two tools share
/// a name the later registration wins lookups, and both schemas are still
/// advertised in order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry, extracting every tool's schema up front.
    pub fn build(tools: &[Arc<dyn Tool>]) -> Result<Self> {
        let mut registry = Self::default();
        for tool in tools {
            registry.register(tool.clone())?;
        }
        Ok(registry)
    }

    /// Add a tool, failing if its schema cannot be extracted.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let schema = function_to_json(tool.signature())?.advertised();
        let wants_context_variables = tool.wants_context_variables();
        self.by_name
            .insert(schema.name().to_string(), self.entries.len());
        self.entries.push(RegisteredTool {
            tool,
            schema,
            wants_context_variables,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Advertised schemas in registration order.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.entries.iter().map(|e| e.schema.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.schema.name()))
            .finish()
    }
}
