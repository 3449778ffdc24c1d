//! Request assembly: agent + history -> provider-agnostic completion request.

use serde::Serialize;
use tracing::debug;

use crate::agent::{Agent, ToolChoice};
use crate::context::ContextVariables;
use crate::tools::Tool;
use crate::types::Message;

/// A completion request handed to a [`CompletionProvider`](crate::provider::CompletionProvider).
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    /// Resolved system prompt followed by the conversation history.
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Only present when at least one tool is offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    pub stream: bool,
}

/// Tool schema as exposed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Describe a tool, hiding the reserved context parameter.
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().exposed_schema(),
        }
    }
}

/// Build the request for one turn of `agent` over `history`.
pub fn build_request(
    agent: &Agent,
    history: &[Message],
    context: &ContextVariables,
    model_override: Option<&str>,
    stream: bool,
) -> CompletionRequest {
    let instructions = agent.instructions().resolve(context);

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(instructions));
    messages.extend(history.iter().cloned());

    let tools: Vec<ToolDefinition> = agent
        .tools()
        .iter()
        .map(|t| ToolDefinition::from_tool(t.as_ref()))
        .collect();
    let has_tools = !tools.is_empty();

    let model = model_override.unwrap_or(agent.model()).to_string();
    debug!(
        agent = agent.name(),
        model = %model,
        messages = messages.len(),
        tools = tools.len(),
        "building chat completion request"
    );

    CompletionRequest {
        model,
        messages,
        tools: has_tools.then_some(tools),
        tool_choice: agent.tool_choice().cloned(),
        parallel_tool_calls: has_tools.then_some(agent.parallel_tool_calls()),
        stream,
    }
}
