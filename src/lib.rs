//! Swarm: multi-agent conversation orchestration.
//!
//! A turn-based loop drives the active [`Agent`](agent::Agent) against a
//! tool-calling chat-completion provider. Tool calls requested by the model
//! are executed locally and fed back into the conversation; a tool may hand
//! the conversation off to another agent, and every call can read and patch
//! a shared bag of [context variables](context::ContextVariables).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use swarm::prelude::*;
//!
//! # async fn example() -> swarm::error::Result<()> {
//! let spanish = Arc::new(Agent::new("Spanish Agent").with_instructions("You only speak Spanish."));
//! let handoff = spanish.clone();
//! let english = Agent::new("English Agent")
//!     .with_instructions("You only speak English.")
//!     .with_tool(FunctionTool::sync(
//!         "transfer_to_spanish_agent",
//!         "Transfer spanish speaking users immediately.",
//!         ToolParameters::empty(),
//!         move |_args| Ok(handoff.clone()),
//!     ));
//!
//! let swarm = Swarm::from_config(&SwarmConfig::load(None)?)?;
//! let response = swarm
//!     .run(RunRequest::new(english, vec![Message::user("Hola. ¿Como estás?")]))
//!     .await?;
//! println!("{}: {}", response.agent.name(), response.messages.last().map(Message::text).unwrap_or(""));
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod request;
pub mod stream;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{RunEvent, RunRequest, RunResponse, Swarm};
