//! Context variables threaded through every turn.
//!
//! [`ContextVariables`] is a string-keyed bag of JSON values. Reading a key
//! that was never set yields an empty string rather than an error, and
//! [`ContextVariables::get`] records that default so repeated reads agree.
//! Tools receive the live bag when they declare the reserved
//! [`CONTEXT_VARIABLES_PARAM`] parameter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved parameter name a tool declares to receive the context bag.
pub const CONTEXT_VARIABLES_PARAM: &str = "context_variables";

static EMPTY: Value = Value::String(String::new());

/// Mutable string-keyed state shared by the engine, instructions and tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextVariables {
    values: Map<String, Value>,
}

impl ContextVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value, recording `""` for keys that are absent.
    pub fn get(&mut self, key: &str) -> &Value {
        self.values
            .entry(key.to_string())
            .or_insert_with(|| Value::String(String::new()))
    }

    /// Read a value without recording the default.
    pub fn lookup(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&EMPTY)
    }

    /// Display form of a value: strings unquoted, anything else as JSON.
    pub fn get_str(&self, key: &str) -> String {
        match self.lookup(key) {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Overwrite-by-key union; the patch wins on conflicts.
    pub fn merge<I, K>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in patch {
            self.values.insert(key.into(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// JSON object form, as injected into tool arguments.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<Map<String, Value>> for ContextVariables {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ContextVariables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ContextVariables {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
