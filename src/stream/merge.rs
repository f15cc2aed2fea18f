//! Reassembly of streamed assistant deltas into a complete message.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Result, SwarmError};
use crate::types::{AssistantMessage, FunctionCall, ToolCall};

/// Merge `source` into `target` field by field.
///
/// Strings are appended, objects are merged recursively, nulls are skipped
/// and other scalars are ignored. A string meeting an object is an error.
pub fn merge_fields(target: &mut Map<String, Value>, source: &Map<String, Value>) -> Result<()> {
    for (key, value) in source {
        match value {
            Value::String(fragment) => match target.get_mut(key) {
                Some(Value::String(existing)) => existing.push_str(fragment),
                Some(Value::Null) | None => {
                    target.insert(key.clone(), Value::String(fragment.clone()));
                }
                Some(other) => {
                    return Err(mismatch(key, "string", other));
                }
            },
            Value::Object(nested) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                match slot {
                    Value::Object(inner) => merge_fields(inner, nested)?,
                    other => return Err(mismatch(key, "object", other)),
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn mismatch(key: &str, incoming: &str, existing: &Value) -> SwarmError {
    SwarmError::MalformedDelta(format!(
        "field '{key}' received a {incoming} fragment but holds {existing}"
    ))
}

fn empty_tool_call_slot() -> Map<String, Value> {
    let mut function = Map::new();
    function.insert("name".into(), Value::String(String::new()));
    function.insert("arguments".into(), Value::String(String::new()));

    let mut slot = Map::new();
    slot.insert("id".into(), Value::String(String::new()));
    slot.insert("type".into(), Value::String(String::new()));
    slot.insert("function".into(), Value::Object(function));
    slot
}

/// Accumulates the deltas of one streamed assistant turn.
#[derive(Debug, Default)]
pub struct ChunkMerger {
    message: Map<String, Value>,
    tool_calls: BTreeMap<u64, Map<String, Value>>,
    deltas: usize,
}

impl ChunkMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deltas merged so far.
    pub fn len(&self) -> usize {
        self.deltas
    }

    pub fn is_empty(&self) -> bool {
        self.deltas == 0
    }

    /// Fold one delta into the accumulated message.
    pub fn merge(&mut self, delta: &Value) -> Result<()> {
        let Value::Object(fields) = delta else {
            return Err(SwarmError::MalformedDelta(format!(
                "delta must be an object, got {delta}"
            )));
        };

        let mut fields = fields.clone();
        fields.remove("role");
        let tool_calls = fields.remove("tool_calls");

        merge_fields(&mut self.message, &fields)?;

        match tool_calls {
            None | Some(Value::Null) => {}
            Some(Value::Array(fragments)) => {
                for fragment in &fragments {
                    self.merge_tool_call(fragment)?;
                }
            }
            Some(other) => {
                return Err(SwarmError::MalformedDelta(format!(
                    "tool_calls must be an array, got {other}"
                )));
            }
        }

        self.deltas += 1;
        Ok(())
    }

    fn merge_tool_call(&mut self, fragment: &Value) -> Result<()> {
        let Value::Object(fragment) = fragment else {
            return Err(SwarmError::MalformedDelta(format!(
                "tool call fragment must be an object, got {fragment}"
            )));
        };
        let index = fragment
            .get("index")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                SwarmError::MalformedDelta("tool call fragment without integer index".into())
            })?;

        let mut fragment = fragment.clone();
        fragment.remove("index");

        let slot = self
            .tool_calls
            .entry(index)
            .or_insert_with(empty_tool_call_slot);
        merge_fields(slot, &fragment)
    }

    /// Produce the assembled assistant message, tagged with `sender`.
    pub fn finish(self, sender: impl Into<String>) -> Result<AssistantMessage> {
        let content = match self.message.get("content") {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        };

        let tool_calls = self
            .tool_calls
            .into_values()
            .map(slot_to_tool_call)
            .collect::<Result<Vec<_>>>()?;

        Ok(AssistantMessage {
            content,
            tool_calls: None,
            sender: None,
        }
        .with_tool_calls(tool_calls)
        .with_sender(sender))
    }
}

fn slot_to_tool_call(slot: Map<String, Value>) -> Result<ToolCall> {
    let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or_default().to_string();

    let function = slot.get("function").and_then(Value::as_object).ok_or_else(|| {
        SwarmError::MalformedDelta("tool call slot lost its function object".into())
    })?;
    let kind = text(slot.get("type"));

    Ok(ToolCall {
        id: text(slot.get("id")),
        kind: if kind.is_empty() { "function".into() } else { kind },
        function: FunctionCall {
            name: text(function.get("name")),
            arguments: text(function.get("arguments")),
        },
    })
}
