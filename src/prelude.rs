//! Convenience re-exports for common use.

pub use crate::agent::{Agent, Instructions, ToolChoice};
pub use crate::config::SwarmConfig;
pub use crate::context::ContextVariables;
pub use crate::engine::{RunEvent, RunRequest, RunResponse, Swarm};
pub use crate::error::{Result, SwarmError};
pub use crate::provider::CompletionProvider;
pub use crate::tools::{FunctionTool, Tool, ToolArguments, ToolOutcome, ToolParameters, ToolResult};
pub use crate::types::{Message, MessageDelta, Role, ToolCall};
