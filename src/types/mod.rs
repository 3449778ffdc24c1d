//! Core types for Swarm.

pub mod message;
pub mod stream;

pub use message::*;
pub use stream::*;
