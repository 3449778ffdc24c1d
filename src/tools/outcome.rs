//! What a tool hands back to the dispatcher.

use std::sync::Arc;

use serde_json::Value;

use crate::agent::Agent;
use crate::context::ContextVariables;

/// Outcome of a tool invocation.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// A plain value; rendered to text for the tool reply.
    Value(Value),
    /// Structured result with optional handoff and context patch.
    Result(ToolResult),
    /// Hand the conversation to this agent.
    Handoff(Arc<Agent>),
}

impl ToolOutcome {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Value(Value::String(text.into()))
    }
}

impl From<String> for ToolOutcome {
    fn from(text: String) -> Self {
        Self::Value(Value::String(text))
    }
}

impl From<&str> for ToolOutcome {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<Value> for ToolOutcome {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ToolResult> for ToolOutcome {
    fn from(result: ToolResult) -> Self {
        Self::Result(result)
    }
}

impl From<Arc<Agent>> for ToolOutcome {
    fn from(agent: Arc<Agent>) -> Self {
        Self::Handoff(agent)
    }
}

impl From<Agent> for ToolOutcome {
    fn from(agent: Agent) -> Self {
        Self::Handoff(Arc::new(agent))
    }
}

/// Structured tool result.
#[derive(Debug, Clone, Default)]
pub struct ToolResult {
    /// Content of the tool reply message.
    pub value: String,
    /// Agent to switch to once the batch completes.
    pub agent: Option<Arc<Agent>>,
    /// Patch merged into the run's context variables.
    pub context_variables: ContextVariables,
}

impl ToolResult {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_agent(mut self, agent: Arc<Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn with_context_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context_variables.insert(key, value);
        self
    }

    pub fn with_context_variables(mut self, patch: ContextVariables) -> Self {
        self.context_variables.merge(patch);
        self
    }
}
