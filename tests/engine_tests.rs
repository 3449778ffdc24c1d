//! Turn engine behavior against a scripted provider.

mod common;

use std::sync::Arc;

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{FailingProvider, ScriptedProvider};
use swarm::prelude::*;
use swarm::types::ToolCallDelta;

fn swarm_with(provider: &Arc<ScriptedProvider>) -> Swarm {
    Swarm::new(provider.clone())
}

fn spanish_agent() -> Arc<Agent> {
    Arc::new(
        Agent::new("Spanish Agent")
            .with_model("gpt-4o-mini")
            .with_instructions("You only speak Spanish."),
    )
}

fn english_agent(spanish: Arc<Agent>) -> Agent {
    Agent::new("English Agent")
        .with_instructions("You only speak English.")
        .with_tool(FunctionTool::sync(
            "transfer_to_spanish_agent",
            "Transfer spanish speaking users immediately.",
            ToolParameters::empty(),
            move |_args| Ok(spanish.clone()),
        ))
}

#[tokio::test]
async fn agent_without_tools_makes_one_completion() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_text("Hello there!");

    let response = swarm_with(&provider)
        .run(RunRequest::new(Agent::default(), vec![Message::user("Hi")]))
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(response.messages.len(), 1);
    assert_eq!(response.messages[0].text(), "Hello there!");
    assert_eq!(response.messages[0].sender.as_deref(), Some("Agent"));
    assert_eq!(response.agent.name(), "Agent");
}

#[tokio::test]
async fn first_request_has_system_prompt_and_history() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_text("ok");

    swarm_with(&provider)
        .run(RunRequest::new(Agent::default(), vec![Message::user("Hi")]))
        .await
        .unwrap();

    let request = &provider.requests()[0];
    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].text(), "You are a helpful agent.");
    assert_eq!(request.messages[1].text(), "Hi");
    assert!(request.tools.is_none());
    assert!(request.parallel_tool_calls.is_none());
    assert!(!request.stream);
}

#[tokio::test]
async fn handoff_switches_agent_for_next_turn() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "transfer_to_spanish_agent", json!({}));
    provider.queue_text("¡Hola! Estoy bien.");

    let english = english_agent(spanish_agent());
    let response = swarm_with(&provider)
        .run(RunRequest::new(english, vec![Message::user("Hola. ¿Como estás?")]))
        .await
        .unwrap();

    assert_eq!(response.agent.name(), "Spanish Agent");
    assert_eq!(response.messages.len(), 3);

    let call = &response.messages[0];
    assert_eq!(call.sender.as_deref(), Some("English Agent"));
    assert_eq!(call.tool_calls[0].name(), "transfer_to_spanish_agent");

    let reply = &response.messages[1];
    assert_eq!(reply.role, Role::Tool);
    assert_eq!(reply.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(reply.text(), r#"{"assistant":"Spanish Agent"}"#);

    assert_eq!(response.messages[2].sender.as_deref(), Some("Spanish Agent"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].model, "gpt-4o-mini");
    assert_eq!(requests[1].messages[0].text(), "You only speak Spanish.");
    assert!(requests[1].tools.is_none());
}

#[tokio::test]
async fn structured_result_can_hand_off_and_patch_context() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "escalate", json!({}));
    provider.queue_text("Billing here.");

    let billing = Arc::new(
        Agent::new("Billing")
            .with_model("gpt-4o-mini")
            .with_dynamic_instructions(|ctx| format!("Ticket {}.", ctx.get_str("ticket"))),
    );
    let target = billing.clone();
    let triage = Agent::new("Triage").with_tool(FunctionTool::sync(
        "escalate",
        "Escalate to billing",
        ToolParameters::empty(),
        move |_args| {
            Ok(ToolResult::new("ok")
                .with_agent(target.clone())
                .with_context_variable("ticket", 42))
        },
    ));

    let response = swarm_with(&provider)
        .run(RunRequest::new(triage, vec![Message::user("refund please")]))
        .await
        .unwrap();

    assert_eq!(response.messages[1].text(), "ok");
    assert_eq!(response.agent.name(), "Billing");
    assert_eq!(response.context_variables.lookup("ticket"), &json!(42));

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].model, "gpt-4o-mini");
    assert_eq!(requests[1].messages[0].text(), "Ticket 42.");
    assert_eq!(response.messages[2].sender.as_deref(), Some("Billing"));
}

#[tokio::test]
async fn handoff_with_single_turn_returns_new_agent_and_unchanged_context() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "transfer_to_spanish_agent", json!({}));

    let context: ContextVariables = [("user_id", json!(123))].into_iter().collect();
    let request = RunRequest::builder()
        .agent(english_agent(spanish_agent()))
        .messages(vec![Message::user("Hola")])
        .context_variables(context.clone())
        .max_turns(1)
        .build();
    let response = swarm_with(&provider).run(request).await.unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(response.agent.name(), "Spanish Agent");
    assert_eq!(response.messages.len(), 2);
    assert_eq!(response.context_variables, context);
}

#[tokio::test]
async fn max_turns_one_issues_exactly_one_request() {
    let provider = Arc::new(ScriptedProvider::new());
    for i in 0..3 {
        provider.queue_tool_call(&format!("call_{i}"), "ping", json!({}));
    }

    let agent = Agent::new("Pinger").with_tool(FunctionTool::sync(
        "ping",
        "Ping",
        ToolParameters::empty(),
        |_args| Ok("pong"),
    ));
    let request = RunRequest::builder()
        .agent(agent)
        .messages(vec![Message::user("go")])
        .max_turns(1)
        .build();
    let response = swarm_with(&provider).run(request).await.unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(response.messages.len(), 2);
    assert_eq!(response.messages[1].text(), "pong");
}

#[tokio::test]
async fn tools_disabled_stops_after_first_reply() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "transfer_to_spanish_agent", json!({}));

    let request = RunRequest::builder()
        .agent(english_agent(spanish_agent()))
        .messages(vec![Message::user("Hola")])
        .execute_tools(false)
        .build();
    let response = swarm_with(&provider).run(request).await.unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(response.messages.len(), 1);
    assert!(response.messages[0].has_tool_calls());
    assert_eq!(response.agent.name(), "English Agent");
}

#[tokio::test]
async fn unknown_tools_are_reported_and_the_loop_continues() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_message(Message::assistant_tool_calls(vec![
        ToolCall::new("a", "nope", "{}"),
        ToolCall::new("b", "missing", "{}"),
        ToolCall::new("c", "gone", "{}"),
    ]));
    provider.queue_text("Sorry about that.");

    let response = swarm_with(&provider)
        .run(RunRequest::new(Agent::default(), vec![Message::user("hi")]))
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 2);
    let replies: Vec<&str> = response.messages[1..4].iter().map(Message::text).collect();
    assert_eq!(
        replies,
        vec![
            "Error: Tool nope not found.",
            "Error: Tool missing not found.",
            "Error: Tool gone not found.",
        ]
    );
    assert_eq!(response.messages[4].text(), "Sorry about that.");
}

#[tokio::test]
async fn malformed_arguments_abort_the_run() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_message(Message::assistant_tool_calls(vec![ToolCall::new(
        "call_9",
        "ping",
        "{not json",
    )]));

    let agent = Agent::new("Pinger").with_tool(FunctionTool::sync(
        "ping",
        "Ping",
        ToolParameters::empty(),
        |_args| Ok("pong"),
    ));
    let err = swarm_with(&provider)
        .run(RunRequest::new(agent, vec![Message::user("go")]))
        .await
        .unwrap_err();

    assert!(err.is_fatal_tool_error());
    assert_eq!(err.tool_call(), Some(("ping", "call_9")));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn provider_errors_propagate() {
    let swarm = Swarm::new(Arc::new(FailingProvider));
    let err = swarm
        .run(RunRequest::new(Agent::default(), vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, SwarmError::Api { status: 500, .. }));
}

#[tokio::test]
async fn context_patches_reach_next_turn_instructions() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "remember_name", json!({"name": "Ada"}));
    provider.queue_text("Nice to meet you, Ada.");

    let agent = Agent::new("Greeter")
        .with_dynamic_instructions(|ctx| format!("Help the user, {}.", ctx.get_str("name")))
        .with_tool(FunctionTool::sync(
            "remember_name",
            "Store the user's name",
            ToolParameters::object()
                .string("name", "The name", true)
                .context_variables()
                .build(),
            |args| {
                let name = args.get_str("name")?.to_string();
                Ok(ToolResult::new("Stored.").with_context_variable("name", name))
            },
        ));

    let response = swarm_with(&provider)
        .run(RunRequest::new(agent, vec![Message::user("I'm Ada")]))
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests[0].messages[0].text(), "Help the user, .");
    assert_eq!(requests[1].messages[0].text(), "Help the user, Ada.");
    assert_eq!(response.context_variables.get_str("name"), "Ada");

    let tools = requests[0].tools.as_ref().unwrap();
    assert_eq!(
        tools[0].parameters,
        json!({
            "type": "object",
            "properties": {"name": {"type": "string", "description": "The name"}},
            "required": ["name"],
        })
    );
}

#[tokio::test]
async fn tools_receive_context_variables_when_declared() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "whoami", json!({}));

    let agent = Agent::new("Support").with_tool(FunctionTool::sync(
        "whoami",
        "Report the user id",
        ToolParameters::object().context_variables().build(),
        |args| Ok(args.context_variables().get_str("user_id")),
    ));
    let request = RunRequest::builder()
        .agent(agent)
        .messages(vec![Message::user("who am I?")])
        .context_variables([("user_id", json!(123))].into_iter().collect())
        .max_turns(1)
        .build();
    let response = swarm_with(&provider).run(request).await.unwrap();

    assert_eq!(response.messages[1].text(), "123");
}

#[tokio::test]
async fn model_override_applies_to_every_agent() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_tool_call("call_1", "transfer_to_spanish_agent", json!({}));
    provider.queue_text("Hola");

    let request = RunRequest::builder()
        .agent(english_agent(spanish_agent()))
        .messages(vec![Message::user("Hola")])
        .model_override("gpt-4.1")
        .build();
    swarm_with(&provider).run(request).await.unwrap();

    let models: Vec<String> = provider.requests().into_iter().map(|r| r.model).collect();
    assert_eq!(models, vec!["gpt-4.1", "gpt-4.1"]);
}

#[tokio::test]
async fn input_history_is_not_part_of_the_response() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_text("Third");

    let history = vec![
        Message::user("First"),
        Message::assistant("Second").with_sender("Agent"),
        Message::user("again"),
    ];
    let response = swarm_with(&provider)
        .run(RunRequest::new(Agent::default(), history))
        .await
        .unwrap();

    assert_eq!(response.messages.len(), 1);
    assert_eq!(response.messages[0].text(), "Third");
    assert_eq!(provider.requests()[0].messages.len(), 4);
}

#[tokio::test]
async fn streaming_emits_delimited_events_and_final_response() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_stream(vec![
        MessageDelta {
            role: Some(Role::Assistant),
            ..Default::default()
        },
        MessageDelta::tool_call(ToolCallDelta::start(0, "call_1", "transfer_to_spanish_agent")),
        MessageDelta::tool_call(ToolCallDelta::arguments(0, "{")),
        MessageDelta::tool_call(ToolCallDelta::arguments(0, "}")),
    ]);
    provider.queue_stream(vec![
        MessageDelta {
            role: Some(Role::Assistant),
            content: Some("¡Ho".into()),
            ..Default::default()
        },
        MessageDelta::text("la!"),
    ]);

    let request = RunRequest::builder()
        .agent(english_agent(spanish_agent()))
        .messages(vec![Message::user("Hola")])
        .stream(true)
        .build();
    let events: Vec<RunEvent> = swarm_with(&provider)
        .run_and_stream(request)
        .map(|event| event.unwrap())
        .collect()
        .await;

    let starts: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Start { agent } => Some(agent.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(starts, vec!["English Agent", "Spanish Agent"]);
    assert_eq!(events.iter().filter(|e| matches!(e, RunEvent::End)).count(), 2);

    let RunEvent::Delta(first) = &events[1] else {
        panic!("expected a delta after start, got {:?}", events[1]);
    };
    assert_eq!(first.sender.as_deref(), Some("English Agent"));

    let Some(RunEvent::Response(response)) = events.last() else {
        panic!("stream must end with a response");
    };
    assert_eq!(response.agent.name(), "Spanish Agent");
    assert_eq!(response.messages.len(), 3);
    assert_eq!(response.messages[0].tool_calls[0].arguments(), "{}");
    assert_eq!(response.messages[0].tool_calls[0].id, "call_1");
    assert_eq!(response.messages[2].text(), "¡Hola!");
    assert_eq!(response.messages[2].sender.as_deref(), Some("Spanish Agent"));
    assert!(provider.requests().iter().all(|r| r.stream));
}

#[tokio::test]
async fn run_with_stream_flag_returns_accumulated_response() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.queue_stream(vec![
        MessageDelta::text("Hel"),
        MessageDelta::text("lo"),
    ]);

    let request = RunRequest::builder()
        .agent(Agent::default())
        .messages(vec![Message::user("hi")])
        .stream(true)
        .build();
    let response = swarm_with(&provider).run(request).await.unwrap();

    assert_eq!(response.messages.len(), 1);
    assert_eq!(response.messages[0].text(), "Hello");
    assert_eq!(response.messages[0].sender.as_deref(), Some("Agent"));
}

#[tokio::test]
async fn streaming_provider_failure_ends_the_stream_with_an_error() {
    let swarm = Swarm::new(Arc::new(FailingProvider));
    let request = RunRequest::builder()
        .agent(Agent::default())
        .messages(vec![Message::user("hi")])
        .stream(true)
        .build();
    let events: Vec<_> = swarm.run_and_stream(request).collect().await;

    assert_eq!(events.len(), 1);
    assert!(events[0].is_err());
}
