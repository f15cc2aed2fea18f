//! Function signatures and the tool schemas derived from them.
//!
//! A tool declares its signature once, when it is constructed. The schema
//! advertised to the model is extracted from that declaration by
//! [`function_to_json`].

use serde::{Deserialize, Serialize};

use crate::context::CONTEXT_VARIABLES_PARAM;
use crate::error::{Result, SwarmError};

const MAX_FUNCTION_NAME_LEN: usize = 64;

/// Declared type of a function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Float,
    Boolean,
    Sequence,
    Mapping,
    Null,
    /// No annotation; advertised as a string.
    Unannotated,
    /// A type with no JSON Schema counterpart; advertised as a string.
    Other(String),
}

impl ParamType {
    /// JSON Schema type name advertised for this parameter type.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::Sequence => "array",
            Self::Mapping => "object",
            Self::Null => "null",
            Self::Unannotated | Self::Other(_) => "string",
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    /// Parameters with a default are optional for the caller.
    pub has_default: bool,
}

/// Name, documentation and ordered parameter list of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<Param>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
        }
    }

    /// Set the doc string.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a required parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            has_default: false,
        });
        self
    }

    /// Add a parameter that has a default value.
    pub fn optional(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            has_default: true,
        });
        self
    }

    /// Declare the reserved context-variables parameter.
    pub fn context_variables(self) -> Self {
        self.param(CONTEXT_VARIABLES_PARAM, ParamType::Mapping)
    }

    /// Whether the reserved context-variables parameter is declared.
    pub fn wants_context_variables(&self) -> bool {
        self.params.iter().any(|p| p.name == CONTEXT_VARIABLES_PARAM)
    }

    /// Look up a declared parameter.
    pub fn get_param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Tool definition in the chat-completions `tools` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: ParametersSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub required: Vec<String>,
}

impl ToolSchema {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Copy of this schema with `param` removed from `properties` and `required`.
    pub fn without_param(&self, param: &str) -> Self {
        let mut schema = self.clone();
        schema.function.parameters.properties.shift_remove(param);
        schema.function.parameters.required.retain(|name| name != param);
        schema
    }

    /// The schema as advertised to the model (context variables hidden).
    pub fn advertised(&self) -> Self {
        self.without_param(CONTEXT_VARIABLES_PARAM)
    }
}

/// Extract the tool schema for a declared signature.
///
/// `required` lists every parameter without a default in declaration order.
/// The reserved context-variables parameter is kept; callers strip it with
/// [`ToolSchema::advertised`] before sending the schema to a model.
pub fn function_to_json(signature: &FunctionSignature) -> Result<ToolSchema> {
    check_function_name(&signature.name)?;

    let mut properties = serde_json::Map::new();
    for param in &signature.params {
        if param.name.trim().is_empty() {
            return Err(SwarmError::schema(
                &signature.name,
                "parameter with an empty name",
            ));
        }
        if properties.contains_key(&param.name) {
            return Err(SwarmError::schema(
                &signature.name,
                format!("duplicate parameter '{}'", param.name),
            ));
        }
        properties.insert(
            param.name.clone(),
            serde_json::json!({ "type": param.ty.json_type() }),
        );
    }

    let required = signature
        .params
        .iter()
        .filter(|p| !p.has_default)
        .map(|p| p.name.clone())
        .collect();

    Ok(ToolSchema {
        kind: "function".to_string(),
        function: FunctionSchema {
            name: signature.name.clone(),
            description: signature.description.clone().unwrap_or_default(),
            parameters: ParametersSchema {
                kind: "object".to_string(),
                properties,
                required,
            },
        },
    })
}

fn check_function_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SwarmError::schema(name, "function name is empty"));
    }
    if name.len() > MAX_FUNCTION_NAME_LEN {
        return Err(SwarmError::schema(
            name,
            format!("function name exceeds {MAX_FUNCTION_NAME_LEN} characters"),
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(SwarmError::schema(
            name,
            format!("invalid character '{bad}' in function name"),
        ));
    }
    Ok(())
}
