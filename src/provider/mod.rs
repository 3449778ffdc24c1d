//! Completion provider trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SwarmError;
use crate::request::CompletionRequest;
use crate::types::{Message, MessageDelta};

/// Stream of response fragments for one completion.
pub type DeltaStream = BoxStream<'static, Result<MessageDelta, SwarmError>>;

/// A remote chat-completion endpoint.
///
/// The engine issues one request at a time per run and never retries;
/// transport and provider failures surface to the caller unchanged.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Return one complete assistant message.
    async fn complete(&self, request: &CompletionRequest) -> Result<Message, SwarmError>;

    /// Return the assistant message as a stream of fragments.
    async fn stream(&self, request: &CompletionRequest) -> Result<DeltaStream, SwarmError>;
}

/// Create the default provider from config.
#[cfg(feature = "openai")]
pub fn create_provider(
    config: &crate::config::SwarmConfig,
) -> Result<Box<dyn CompletionProvider>, SwarmError> {
    let api_key = config
        .get_api_key("openai")
        .ok_or_else(|| SwarmError::Authentication("Missing OPENAI_API_KEY".into()))?;
    Ok(Box::new(openai::OpenAiProvider::new(
        api_key,
        config.get_base_url("openai"),
        config.request_timeout(),
    )?))
}
