//! Typed access to the argument payload of a tool call.

use serde::de::DeserializeOwned;

use crate::error::{Result, SwarmError};

/// Parsed keyword arguments of one tool call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: serde_json::Map<String, serde_json::Value>,
}

impl ToolArguments {
    pub fn new(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Parse the raw JSON payload sent by the model. A blank payload means no arguments.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Self::from_value(serde_json::from_str(trimmed)?)
    }

    /// Build from an already-decoded JSON value, which must be an object.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(values) => Ok(Self { values }),
            serde_json::Value::Null => Ok(Self::default()),
            other => Err(SwarmError::InvalidArgument(format!(
                "tool arguments must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn raw(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove an argument, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.shift_remove(key)
    }

    /// Get a required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get_str_opt(key)
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Get a required integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.values
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a required number argument.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.values
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing number argument: {key}")))
    }

    /// Get a required boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Deserialize all arguments into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(serde_json::Value::Object(self.values.clone())).map_err(|e| {
            SwarmError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
