//! Error types for Swarm.

use thiserror::Error;

/// Primary error type for all Swarm operations.
#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    /// The provider produced tool-call arguments that are not a JSON object.
    #[error("Malformed arguments for tool '{tool_name}' (call {call_id}): {message}")]
    MalformedToolArguments {
        tool_name: String,
        call_id: String,
        message: String,
    },

    #[error("Tool execution error: {tool_name} (call {call_id}): {message}")]
    ToolExecution {
        tool_name: String,
        call_id: String,
        message: String,
    },

    /// A tool returned a value that could not be rendered as message content.
    #[error("Tool output error: {tool_name} (call {call_id}): {message}")]
    ToolOutput {
        tool_name: String,
        call_id: String,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl SwarmError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error came out of a single tool call (and aborted the run).
    pub fn is_fatal_tool_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedToolArguments { .. } | Self::ToolExecution { .. } | Self::ToolOutput { .. }
        )
    }

    /// Whether a caller could reasonably retry the whole run.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 500..=599),
            _ => false,
        }
    }

    /// Tool name and call id for tool-level failures.
    pub fn tool_call(&self) -> Option<(&str, &str)> {
        match self {
            Self::MalformedToolArguments {
                tool_name, call_id, ..
            }
            | Self::ToolExecution {
                tool_name, call_id, ..
            }
            | Self::ToolOutput {
                tool_name, call_id, ..
            } => Some((tool_name.as_str(), call_id.as_str())),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SwarmError>;
