//! Events yielded by [`Swarm::run_and_stream`](super::Swarm::run_and_stream).

use crate::types::MessageDelta;

use super::types::RunResponse;

/// One item of a streamed run.
///
/// Every completion is bracketed by `Start` and `End`; the stream closes
/// with a single `Response`.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// A completion for `agent` is being streamed.
    Start { agent: String },
    /// A raw fragment, as received. The opening assistant fragment carries
    /// the sender.
    Delta(MessageDelta),
    End,
    Response(RunResponse),
}
