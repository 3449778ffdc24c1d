//! Line-oriented interactive loop.

use std::io::Write;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::agent::Agent;
use crate::config::SwarmConfig;
use crate::context::ContextVariables;
use crate::engine::{RunEvent, RunRequest, RunResponse, Swarm};
use crate::error::SwarmError;
use crate::tools::{FunctionTool, ToolParameters};
use crate::types::{Message, Role, ToolCall};

/// Per-input run settings for [`run_demo_loop`].
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    pub model_override: Option<String>,
    pub stream: bool,
    pub max_turns: Option<usize>,
    pub debug: bool,
}

impl DemoOptions {
    /// Pick the run-wide model override: the command line wins over the
    /// configured `default_model`.
    pub fn resolve_model(cli_model: Option<String>, config: &SwarmConfig) -> Option<String> {
        cli_model.or_else(|| config.default_model().map(str::to_string))
    }
}

/// English agent that hands Spanish speakers off to a Spanish agent.
pub fn language_demo_agent() -> Arc<Agent> {
    let spanish = Arc::new(
        Agent::new("Spanish Agent").with_instructions("You only speak Spanish."),
    );
    let english = Agent::new("English Agent")
        .with_instructions("You only speak English.")
        .with_tool(FunctionTool::sync(
            "transfer_to_spanish_agent",
            "Transfer spanish speaking users immediately.",
            ToolParameters::empty(),
            move |_args| Ok(spanish.clone()),
        ));
    Arc::new(english)
}

/// Read user lines from `input` and run each against the active agent until
/// `exit` or end of input.
///
/// History, active agent and context variables carry over between inputs.
/// A failed run is reported and its input discarded.
pub async fn run_demo_loop<R, W>(
    swarm: &Swarm,
    starting_agent: Arc<Agent>,
    context_variables: ContextVariables,
    options: &DemoOptions,
    input: R,
    out: &mut W,
) -> Result<(), SwarmError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Starting Swarm CLI. Type 'exit' to quit.")?;

    let mut lines = input.lines();
    let mut history: Vec<Message> = Vec::new();
    let mut agent = starting_agent;
    let mut context = context_variables;

    loop {
        write!(out, "User: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        history.push(Message::user(line));
        let request = RunRequest::builder()
            .agent(agent.clone())
            .messages(history.clone())
            .context_variables(context.clone())
            .maybe_model_override(options.model_override.clone())
            .stream(options.stream)
            .maybe_max_turns(options.max_turns)
            .debug(options.debug)
            .build();

        let result = if options.stream {
            print_streaming_response(swarm.run_and_stream(request), out).await
        } else {
            match swarm.run(request).await {
                Ok(response) => {
                    for text in response.messages.iter().filter_map(format_message) {
                        writeln!(out, "{text}")?;
                    }
                    Ok(response)
                }
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(response) => {
                history.extend(response.messages);
                agent = response.agent;
                context = response.context_variables;
            }
            Err(e) => {
                history.pop();
                writeln!(out, "Error: {e}")?;
            }
        }
    }

    writeln!(out, "Exiting demo loop.")?;
    Ok(())
}

async fn print_streaming_response<W: Write>(
    mut events: BoxStream<'static, Result<RunEvent, SwarmError>>,
    out: &mut W,
) -> Result<RunResponse, SwarmError> {
    while let Some(event) = events.next().await {
        match event? {
            RunEvent::Start { .. } => {}
            RunEvent::Delta(delta) => {
                if let Some(sender) = &delta.sender {
                    write!(out, "{sender}: ")?;
                }
                if let Some(text) = delta.content.as_deref() {
                    write!(out, "{text}")?;
                }
                for fragment in delta.tool_calls.iter().flatten() {
                    let name = fragment.function.as_ref().and_then(|f| f.name.as_deref());
                    if let Some(name) = name.filter(|n| !n.is_empty()) {
                        write!(out, "{name}()")?;
                    }
                }
                out.flush()?;
            }
            RunEvent::End => writeln!(out)?,
            RunEvent::Response(response) => return Ok(response),
        }
    }
    Err(SwarmError::InvalidState(
        "run stream ended without a response".into(),
    ))
}

/// Render an assistant message as `sender: content`, one line per tool call.
/// Other roles render as `None`.
pub fn format_message(message: &Message) -> Option<String> {
    if message.role != Role::Assistant {
        return None;
    }
    let sender = message.sender.as_deref().unwrap_or("assistant");
    let mut lines = Vec::new();
    if !message.text().is_empty() {
        lines.push(format!("{sender}: {}", message.text()));
    }
    for call in &message.tool_calls {
        lines.push(format!("{sender}: {}", format_tool_call(call)));
    }
    if lines.is_empty() {
        lines.push(format!("{sender}:"));
    }
    Some(lines.join("\n"))
}

/// `name(key=value, ...)`; unparseable arguments are shown raw.
pub fn format_tool_call(call: &ToolCall) -> String {
    let args = match serde_json::from_str::<Value>(call.arguments()) {
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
        _ => call.arguments().to_string(),
    };
    format!("{}({args})", call.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_assistant_text_and_calls() {
        let mut message = Message::assistant("Let me check.").with_sender("Triage");
        message.tool_calls = vec![ToolCall::new(
            "call_1",
            "lookup_order",
            r#"{"order_id":42,"verbose":true}"#,
        )];
        assert_eq!(
            format_message(&message).unwrap(),
            "Triage: Let me check.\nTriage: lookup_order(order_id=42, verbose=true)"
        );
    }

    #[test]
    fn skips_non_assistant_messages() {
        assert_eq!(format_message(&Message::user("hi")), None);
        assert_eq!(
            format_message(&Message::tool_result("c", "t", "done")),
            None
        );
    }

    #[test]
    fn raw_arguments_when_not_json() {
        let call = ToolCall::new("c", "echo", "not json");
        assert_eq!(format_tool_call(&call), "echo(not json)");
    }

    #[test]
    fn command_line_model_wins_over_config() {
        let config = SwarmConfig::new().with_default_model("gpt-4o-mini");
        assert_eq!(
            DemoOptions::resolve_model(Some("gpt-4.1".into()), &config).as_deref(),
            Some("gpt-4.1")
        );
        assert_eq!(
            DemoOptions::resolve_model(None, &config).as_deref(),
            Some("gpt-4o-mini")
        );
        assert_eq!(DemoOptions::resolve_model(None, &SwarmConfig::new()), None);
    }

    #[test]
    fn demo_agent_can_hand_off() {
        let agent = language_demo_agent();
        assert_eq!(agent.name(), "English Agent");
        assert!(agent.find_tool("transfer_to_spanish_agent").is_some());
    }
}
