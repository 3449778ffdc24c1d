//! Streaming support: reassembling deltas into messages.

pub mod accumulator;

pub use accumulator::DeltaAccumulator;
