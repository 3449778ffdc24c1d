//! Typed access to tool call arguments.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::{ContextVariables, CONTEXT_VARIABLES_PARAM};
use crate::error::SwarmError;

/// Why a raw argument payload could not be read.
#[derive(Error, Debug)]
pub enum ArgumentsError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Parsed tool-call arguments with typed extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: Map<String, Value>,
}

impl ToolArguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parse the raw argument payload of a tool call.
    ///
    /// A blank payload reads as no arguments. Anything that is not a JSON
    /// object is rejected.
    pub fn parse(raw: &str) -> Result<Self, ArgumentsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str::<Value>(trimmed)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ArgumentsError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Get the raw map.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, SwarmError> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, SwarmError> {
        self.values
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, SwarmError> {
        self.values
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing float argument: {key}")))
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, SwarmError> {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| SwarmError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// The injected context bag; empty when the tool did not ask for it.
    pub fn context_variables(&self) -> ContextVariables {
        match self.values.get(CONTEXT_VARIABLES_PARAM) {
            Some(Value::Object(map)) => ContextVariables::from(map.clone()),
            _ => ContextVariables::new(),
        }
    }

    /// Deserialize the arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, SwarmError> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            SwarmError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
