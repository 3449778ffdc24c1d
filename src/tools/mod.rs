//! Tool system for function calling.

pub mod arguments;
pub mod outcome;
pub mod tool;
pub mod types;

pub use arguments::{ArgumentsError, ToolArguments};
pub use outcome::{ToolOutcome, ToolResult};
pub use tool::{FunctionTool, Tool};
pub use types::{ParameterBuilder, ToolParameters};
