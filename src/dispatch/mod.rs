//! Tool dispatch: run one batch of model-requested tool calls.
//!
//! Calls run one after another in the order the model issued them. Context
//! patches are merged into a working copy of the bag as each call finishes,
//! so later calls in the batch observe earlier ones. The caller only sees
//! the accumulated patch once the whole batch succeeded.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::agent::Agent;
use crate::context::{ContextVariables, CONTEXT_VARIABLES_PARAM};
use crate::error::SwarmError;
use crate::tools::{Tool, ToolArguments, ToolOutcome, ToolResult};
use crate::types::{Message, ToolCall};
use crate::util::debug_print;

/// Everything a processed batch contributes to the run.
#[derive(Debug, Clone, Default)]
pub struct ToolBatch {
    /// One tool-role reply per call, in call order.
    pub messages: Vec<Message>,
    /// Union of all context patches, later calls winning.
    pub context_variables: ContextVariables,
    /// Pending agent switch; the last call requesting one wins.
    pub agent: Option<Arc<Agent>>,
}

/// Execute `tool_calls` against `tools`.
///
/// Unknown tool names become error replies and the batch continues.
/// Malformed arguments, tool failures and unrenderable values abort the
/// batch with an error naming the tool and call id.
pub async fn handle_tool_calls(
    tool_calls: &[ToolCall],
    tools: &[Arc<dyn Tool>],
    context: &ContextVariables,
    debug: bool,
) -> Result<ToolBatch, SwarmError> {
    let mut batch = ToolBatch::default();
    let mut working = context.clone();

    for call in tool_calls {
        let name = call.name();
        let Some(tool) = tools.iter().find(|t| t.name() == name) else {
            warn!(tool = name, call_id = %call.id, "tool not found");
            batch.messages.push(Message::tool_result(
                call.id.clone(),
                name,
                format!("Error: Tool {name} not found."),
            ));
            continue;
        };

        let mut args = ToolArguments::parse(call.arguments()).map_err(|e| {
            SwarmError::MalformedToolArguments {
                tool_name: name.to_string(),
                call_id: call.id.clone(),
                message: e.to_string(),
            }
        })?;
        debug_print!(debug, tool = name, call_id = %call.id, arguments = call.arguments(), "processing tool call");

        if tool.wants_context() {
            args.insert(CONTEXT_VARIABLES_PARAM, working.to_value());
        }

        let outcome = tool
            .invoke(args)
            .await
            .map_err(|e| SwarmError::ToolExecution {
                tool_name: name.to_string(),
                call_id: call.id.clone(),
                message: e.to_string(),
            })?;
        let result = handle_function_result(outcome, name, &call.id)?;

        batch
            .messages
            .push(Message::tool_result(call.id.clone(), name, result.value));
        working.merge(result.context_variables.clone());
        batch.context_variables.merge(result.context_variables);
        if let Some(agent) = result.agent {
            batch.agent = Some(agent);
        }
    }

    Ok(batch)
}

/// Normalize a tool outcome into a [`ToolResult`].
pub fn handle_function_result(
    outcome: ToolOutcome,
    tool_name: &str,
    call_id: &str,
) -> Result<ToolResult, SwarmError> {
    match outcome {
        ToolOutcome::Result(result) => Ok(result),
        ToolOutcome::Handoff(agent) => Ok(ToolResult {
            value: serde_json::json!({ "assistant": agent.name() }).to_string(),
            agent: Some(agent),
            context_variables: ContextVariables::new(),
        }),
        ToolOutcome::Value(value) => {
            let value = coerce_to_string(&value).map_err(|e| SwarmError::ToolOutput {
                tool_name: tool_name.to_string(),
                call_id: call_id.to_string(),
                message: format!("Failed to cast response to string: {e}"),
            })?;
            Ok(ToolResult::new(value))
        }
    }
}

fn coerce_to_string(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string(other),
    }
}
