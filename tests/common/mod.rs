//! Shared test helpers and scripted mock provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use swarm::error::SwarmError;
use swarm::provider::{CompletionProvider, DeltaStream};
use swarm::request::CompletionRequest;
use swarm::types::*;

/// A mock provider that replays queued replies and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Message>>,
    streams: Mutex<VecDeque<Vec<MessageDelta>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain assistant reply.
    pub fn queue_text(&self, text: &str) {
        self.queue_message(Message::assistant(text));
    }

    /// Queue an assistant reply requesting one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_message(Message::assistant_tool_calls(vec![ToolCall::new(
            id,
            name,
            args.to_string(),
        )]));
    }

    pub fn queue_message(&self, message: Message) {
        self.replies.lock().unwrap().push_back(message);
    }

    /// Queue the fragments of one streamed completion.
    pub fn queue_stream(&self, deltas: Vec<MessageDelta>) {
        self.streams.lock().unwrap().push_back(deltas);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Message, SwarmError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Message::assistant("Mock response")))
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<DeltaStream, SwarmError> {
        self.requests.lock().unwrap().push(request.clone());
        let deltas = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                vec![MessageDelta {
                    role: Some(Role::Assistant),
                    content: Some("Mock response".into()),
                    ..Default::default()
                }]
            });
        Ok(Box::pin(stream::iter(deltas.into_iter().map(Ok))))
    }
}

/// A provider whose every call fails.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Message, SwarmError> {
        Err(SwarmError::api(500, "upstream exploded"))
    }

    async fn stream(&self, _request: &CompletionRequest) -> Result<DeltaStream, SwarmError> {
        Err(SwarmError::api(500, "upstream exploded"))
    }
}
