//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::outcome::ToolOutcome;
use super::types::ToolParameters;
use crate::context::CONTEXT_VARIABLES_PARAM;
use crate::error::SwarmError;

/// A local function the model can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Declared parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Whether the live context bag is injected before invocation.
    fn wants_context(&self) -> bool {
        self.parameters().declares(CONTEXT_VARIABLES_PARAM)
    }

    /// Run the tool with parsed arguments.
    async fn invoke(&self, args: ToolArguments) -> Result<ToolOutcome, SwarmError>;
}

type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<ToolOutcome, SwarmError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
#[derive(Clone)]
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    /// Create a tool from an async closure.
    pub fn new<F, Fut, O>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, SwarmError>> + Send + 'static,
        O: Into<ToolOutcome> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| {
                let handler = handler.clone();
                Box::pin(async move { handler(args).await.map(Into::into) })
            }),
        }
    }

    /// Create a tool from a synchronous closure.
    pub fn sync<F, O>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Result<O, SwarmError> + Send + Sync + 'static,
        O: Into<ToolOutcome> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Self::new(name, description, parameters, move |args| {
            let result = handler(args);
            async move { result }
        })
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn invoke(&self, args: ToolArguments) -> Result<ToolOutcome, SwarmError> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
