//! Tool parameter schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::CONTEXT_VARIABLES_PARAM;

/// Parameter declaration of a tool: property schemas plus required names.
///
/// The reserved [`CONTEXT_VARIABLES_PARAM`] may be declared here to opt the
/// tool into receiving the live context bag; it is never shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolParameters {
    /// Create an empty parameter set (no parameters).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            params: Self::default(),
        }
    }

    /// Read `properties` and `required` out of a raw JSON Schema object.
    pub fn from_schema(schema: &Value) -> Self {
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            properties,
            required,
        }
    }

    /// Whether `name` is a declared parameter.
    pub fn declares(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Full JSON Schema, including any reserved parameters.
    pub fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }

    /// JSON Schema as shown to the model: the context parameter is removed
    /// from both `properties` and `required`.
    pub fn exposed_schema(&self) -> Value {
        let mut properties = self.properties.clone();
        properties.remove(CONTEXT_VARIABLES_PARAM);
        let required: Vec<&String> = self
            .required
            .iter()
            .filter(|name| name.as_str() != CONTEXT_VARIABLES_PARAM)
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    params: ToolParameters,
}

impl ParameterBuilder {
    fn property(mut self, name: impl Into<String>, schema: Value, required: bool) -> Self {
        let name = name.into();
        self.params.properties.insert(name.clone(), schema);
        if required {
            self.params.required.push(name);
        }
        self
    }

    /// Add a string property.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = serde_json::json!({"type": "string", "description": description.into()});
        self.property(name, schema, required)
    }

    /// Add a number property.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = serde_json::json!({"type": "number", "description": description.into()});
        self.property(name, schema, required)
    }

    /// Add an integer property.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = serde_json::json!({"type": "integer", "description": description.into()});
        self.property(name, schema, required)
    }

    /// Add a boolean property.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = serde_json::json!({"type": "boolean", "description": description.into()});
        self.property(name, schema, required)
    }

    /// Add an enum (string) property.
    pub fn string_enum(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
        required: bool,
    ) -> Self {
        let schema = serde_json::json!({
            "type": "string",
            "description": description.into(),
            "enum": values,
        });
        self.property(name, schema, required)
    }

    /// Declare the reserved context parameter so the dispatcher injects the
    /// context bag before invocation.
    pub fn context_variables(self) -> Self {
        let schema = serde_json::json!({"type": "object", "description": "Context variables"});
        self.property(CONTEXT_VARIABLES_PARAM, schema, false)
    }

    /// Build into ToolParameters.
    pub fn build(self) -> ToolParameters {
        self.params
    }
}
