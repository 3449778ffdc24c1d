//! The run loop.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{info, Instrument, Span};
use uuid::Uuid;

use crate::agent::Agent;
use crate::context::ContextVariables;
use crate::dispatch::handle_tool_calls;
use crate::error::SwarmError;
use crate::provider::CompletionProvider;
use crate::request::{build_request, CompletionRequest};
use crate::stream::DeltaAccumulator;
use crate::types::{Message, Role, ToolCall};
use crate::util::debug_print;

use super::events::RunEvent;
use super::types::{RunRequest, RunResponse};

/// Multi-agent orchestrator over a [`CompletionProvider`].
///
/// Holds no per-run state, so one `Swarm` can serve many concurrent runs.
#[derive(Clone)]
pub struct Swarm {
    provider: Arc<dyn CompletionProvider>,
}

impl Swarm {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Build a swarm backed by the OpenAI provider described by `config`.
    #[cfg(feature = "openai")]
    pub fn from_config(config: &crate::config::SwarmConfig) -> Result<Self, SwarmError> {
        Ok(Self::new(Arc::from(crate::provider::create_provider(config)?)))
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Run the conversation until the model stops calling tools, tools are
    /// disabled, or `max_turns` is reached.
    pub async fn run(&self, request: RunRequest) -> Result<RunResponse, SwarmError> {
        if request.stream {
            let mut events = self.run_and_stream(request);
            while let Some(event) = events.next().await {
                if let RunEvent::Response(response) = event? {
                    return Ok(response);
                }
            }
            return Err(SwarmError::InvalidState(
                "run stream ended without a response".into(),
            ));
        }

        let span = run_span(&request);
        async move {
            let mut state = RunState::new(request);

            while state.has_turns_left() {
                let completion = state.completion_request(false);
                let message = self.provider.complete(&completion).await?;

                let Some(calls) = state.record_assistant(message) else {
                    break;
                };
                state.execute_tools(&calls).await?;
            }

            Ok::<_, SwarmError>(state.into_response())
        }
        .instrument(span)
        .await
    }

    /// Like [`run`](Self::run), streaming every completion fragment.
    ///
    /// The stream is lazy; the `swarm_run` span covers each step as it is
    /// polled.
    pub fn run_and_stream(
        &self,
        request: RunRequest,
    ) -> BoxStream<'static, Result<RunEvent, SwarmError>> {
        let provider = self.provider.clone();
        let span = run_span(&request);

        let stream = async_stream::try_stream! {
            let mut state = RunState::new(request);

            while state.has_turns_left() {
                let completion = span.in_scope(|| state.completion_request(true));
                let sender = state.active_agent.name().to_string();
                let mut deltas = provider
                    .stream(&completion)
                    .instrument(span.clone())
                    .await?;

                yield RunEvent::Start { agent: sender.clone() };
                let mut accumulator = DeltaAccumulator::new(sender.clone());
                while let Some(delta) = deltas.next().instrument(span.clone()).await {
                    let mut delta = delta?;
                    if delta.role == Some(Role::Assistant) {
                        delta.sender = Some(sender.clone());
                    }
                    accumulator.push(&delta);
                    yield RunEvent::Delta(delta);
                }
                yield RunEvent::End;

                let message = accumulator.finish();
                let Some(calls) = span.in_scope(|| state.record_assistant(message)) else {
                    break;
                };
                state.execute_tools(&calls).instrument(span.clone()).await?;
            }

            yield RunEvent::Response(state.into_response());
        };

        Box::pin(stream)
    }
}

impl std::fmt::Debug for Swarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swarm")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

fn run_span(request: &RunRequest) -> Span {
    tracing::info_span!(
        "swarm_run",
        run_id = %Uuid::new_v4(),
        agent = request.agent.name(),
    )
}

/// Mutable state of one run. Owned by the run future; nothing escapes until
/// the run finishes.
struct RunState {
    active_agent: Arc<Agent>,
    history: Vec<Message>,
    init_len: usize,
    context: ContextVariables,
    model_override: Option<String>,
    max_turns: Option<usize>,
    execute_tools: bool,
    debug: bool,
    turns: usize,
}

impl RunState {
    fn new(request: RunRequest) -> Self {
        let init_len = request.messages.len();
        Self {
            active_agent: request.agent,
            history: request.messages,
            init_len,
            context: request.context_variables,
            model_override: request.model_override,
            max_turns: request.max_turns,
            execute_tools: request.execute_tools,
            debug: request.debug,
            turns: 0,
        }
    }

    fn has_turns_left(&self) -> bool {
        self.max_turns.map_or(true, |max| self.turns < max)
    }

    fn completion_request(&self, stream: bool) -> CompletionRequest {
        debug_print!(
            self.debug,
            agent = self.active_agent.name(),
            turn = self.turns,
            history = self.history.len(),
            "getting chat completion"
        );
        build_request(
            &self.active_agent,
            &self.history,
            &self.context,
            self.model_override.as_deref(),
            stream,
        )
    }

    /// Append the assistant message; returns the calls to execute, or `None`
    /// when the run should stop.
    fn record_assistant(&mut self, mut message: Message) -> Option<Vec<ToolCall>> {
        message.role = Role::Assistant;
        message.sender = Some(self.active_agent.name().to_string());
        let calls = message.tool_calls.clone();
        self.history.push(message);

        if calls.is_empty() || !self.execute_tools {
            debug_print!(self.debug, agent = self.active_agent.name(), "ending turn");
            return None;
        }
        Some(calls)
    }

    async fn execute_tools(&mut self, calls: &[ToolCall]) -> Result<(), SwarmError> {
        let batch = handle_tool_calls(
            calls,
            self.active_agent.tools(),
            &self.context,
            self.debug,
        )
        .await?;

        self.history.extend(batch.messages);
        self.context.merge(batch.context_variables);
        if let Some(next) = batch.agent {
            info!(
                from = self.active_agent.name(),
                to = next.name(),
                "handing off"
            );
            self.active_agent = next;
        }
        self.turns += 1;
        Ok(())
    }

    fn into_response(mut self) -> RunResponse {
        RunResponse {
            messages: self.history.split_off(self.init_len),
            agent: self.active_agent,
            context_variables: self.context,
        }
    }
}
