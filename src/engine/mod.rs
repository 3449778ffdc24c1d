//! Turn engine: drives the active agent, dispatches tools, follows handoffs.

pub mod events;
pub mod runner;
pub mod types;

pub use events::RunEvent;
pub use runner::Swarm;
pub use types::{RunRequest, RunResponse};
