//! Agents: named personas with instructions, a model and tools.

pub mod agent;

pub use agent::{Agent, Instructions, InstructionsFn, ToolChoice};
