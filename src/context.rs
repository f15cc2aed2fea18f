//! Shared state ("context variables") threaded through a run.

use serde::{Deserialize, Serialize};

/// Parameter name a tool declares to receive the run's context variables.
///
/// Never advertised to the model and never filled from model arguments.
pub const CONTEXT_VARIABLES_PARAM: &str = "context_variables";

/// String-keyed mapping of arbitrary JSON values.
///
/// Missing keys read as the empty string. Keys are only ever added or
/// overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextVariables {
    values: serde_json::Map<String, serde_json::Value>,
}

impl ContextVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value if present.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Get a value, defaulting to the empty string for missing keys.
    pub fn get_or_default(&self, key: &str) -> serde_json::Value {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| serde_json::Value::String(String::new()))
    }

    /// Get a string value; missing keys yield `""`, non-strings yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(value) => value.as_str(),
            None => Some(""),
        }
    }

    /// Insert or overwrite a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Overlay `other` onto `self`, overwriting shared keys.
    pub fn merge(&mut self, other: &ContextVariables) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.values.iter()
    }

    /// The variables as a JSON object.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.values.clone())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ContextVariables {
    fn from(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for ContextVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (key, value) in iter {
            vars.set(key, value);
        }
        vars
    }
}
