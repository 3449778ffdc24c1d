//! Run input and output types.

use std::sync::Arc;

use bon::Builder;

use crate::agent::Agent;
use crate::context::ContextVariables;
use crate::types::Message;

/// Input to [`Swarm::run`](super::Swarm::run).
///
/// ```
/// use swarm::agent::Agent;
/// use swarm::engine::RunRequest;
/// use swarm::types::Message;
///
/// let request = RunRequest::builder()
///     .agent(Agent::new("Triage"))
///     .messages(vec![Message::user("Hi!")])
///     .max_turns(4)
///     .build();
/// assert!(request.execute_tools);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct RunRequest {
    /// Agent that handles the first turn.
    #[builder(into)]
    pub agent: Arc<Agent>,
    /// Conversation so far; never includes the system prompt.
    #[builder(default)]
    pub messages: Vec<Message>,
    #[builder(default)]
    pub context_variables: ContextVariables,
    /// Replaces every agent's model for this run.
    #[builder(into)]
    pub model_override: Option<String>,
    #[builder(default)]
    pub stream: bool,
    /// Upper bound on tool-executing turns; `None` runs until the model stops
    /// calling tools.
    pub max_turns: Option<usize>,
    #[builder(default = true)]
    pub execute_tools: bool,
    /// Raise per-turn diagnostics from `debug` to `info`.
    #[builder(default)]
    pub debug: bool,
}

impl RunRequest {
    pub fn new(agent: impl Into<Arc<Agent>>, messages: Vec<Message>) -> Self {
        Self::builder().agent(agent).messages(messages).build()
    }
}

/// Output of one run.
#[derive(Debug, Clone)]
pub struct RunResponse {
    /// Messages produced by this run, in order.
    pub messages: Vec<Message>,
    /// Agent active when the run ended.
    pub agent: Arc<Agent>,
    pub context_variables: ContextVariables,
}

impl RunResponse {
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
