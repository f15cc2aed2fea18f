//! Check tool call arguments against the declared signature before invocation.

use crate::context::CONTEXT_VARIABLES_PARAM;

use super::arguments::ToolArguments;
use super::schema::{FunctionSignature, ParamType};

/// Validate model-supplied arguments against a declared signature.
///
/// Rejects missing required parameters, unknown parameters, and values whose
/// JSON kind does not match the declared type. The reserved context-variables
/// parameter is never expected from the model. Returns the first violation.
pub fn validate_arguments(signature: &FunctionSignature, args: &ToolArguments) -> Result<(), String> {
    for param in &signature.params {
        if param.name == CONTEXT_VARIABLES_PARAM {
            continue;
        }
        match args.get(&param.name) {
            None if !param.has_default => {
                return Err(format!("missing required argument '{}'", param.name));
            }
            None => {}
            Some(value) => {
                if !value_matches(value, &param.ty) {
                    return Err(format!(
                        "argument '{}' expected type '{}', got {}",
                        param.name,
                        param.ty.json_type(),
                        json_kind(value)
                    ));
                }
            }
        }
    }

    if let Some(unknown) = args
        .raw()
        .keys()
        .find(|key| key.as_str() == CONTEXT_VARIABLES_PARAM || signature.get_param(key).is_none())
    {
        return Err(format!("unexpected argument '{unknown}'"));
    }

    Ok(())
}

fn value_matches(value: &serde_json::Value, ty: &ParamType) -> bool {
    match ty {
        ParamType::Text => value.is_string(),
        ParamType::Integer => value.is_i64() || value.is_u64(),
        ParamType::Float => value.is_number(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Sequence => value.is_array(),
        ParamType::Mapping => value.is_object(),
        ParamType::Null => value.is_null(),
        ParamType::Unannotated | ParamType::Other(_) => true,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
