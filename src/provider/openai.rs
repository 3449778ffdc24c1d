//! OpenAI Chat Completions API provider.

use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::SwarmError;
use crate::request::CompletionRequest;
use crate::types::{Message, MessageDelta, Role, ToolCall};

use super::http::{bearer_headers, build_client, parse_sse_data, status_to_error, SseLineBuffer};
use super::{CompletionProvider, DeltaStream};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SwarmError> {
        Ok(Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: build_client(timeout)?,
        })
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_openai)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": request.stream,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(ref tools) = request.tools {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
            }
            if let Some(ref choice) = request.tool_choice {
                obj.insert("tool_choice".into(), serde_json::json!(choice));
            }
            if let Some(parallel) = request.parallel_tool_calls {
                obj.insert("parallel_tool_calls".into(), parallel.into());
            }
        }

        body
    }

    async fn post(&self, request: &CompletionRequest) -> Result<reqwest::Response, SwarmError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Message, SwarmError> {
        debug!(model = %request.model, "OpenAI complete");

        let data: OpenAiChatResponse = self.post(request).await?.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SwarmError::api(200, "No choices in OpenAI response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall::new(tc.id, tc.function.name, tc.function.arguments))
            .collect();

        Ok(Message {
            role: Role::Assistant,
            content: choice.message.content,
            sender: None,
            tool_calls,
            tool_call_id: None,
            tool_name: None,
        })
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<DeltaStream, SwarmError> {
        debug!(model = %request.model, "OpenAI stream");

        let byte_stream = self.post(request).await?.bytes_stream();
        Ok(decode_event_stream(byte_stream))
    }
}

/// Turn an SSE response body into deltas. Stops at the first error.
fn decode_event_stream<S, B>(byte_stream: S) -> DeltaStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut lines = SseLineBuffer::new();
        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(SwarmError::Network(e));
                    return;
                }
            };
            lines.extend(chunk.as_ref());

            while let Some(line) = lines.next_line() {
                match line.and_then(|l| parse_stream_line(&l)) {
                    Ok(Some(delta)) => yield Ok(delta),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        match lines.finish().and_then(|l| parse_stream_line(&l)) {
            Ok(Some(delta)) => yield Ok(delta),
            Ok(None) => {}
            Err(e) => yield Err(e),
        }
    };

    Box::pin(stream)
}

/// Decode one SSE line into a delta; comments, blanks and `[DONE]` yield None.
fn parse_stream_line(line: &str) -> Result<Option<MessageDelta>, SwarmError> {
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }
    let Some(data) = parse_sse_data(line) else {
        return Ok(None);
    };
    let chunk: OpenAiStreamChunk = serde_json::from_str(data)
        .map_err(|e| SwarmError::Stream(format!("unparseable chunk: {e}")))?;
    Ok(chunk.choices.into_iter().next().map(|choice| choice.delta))
}

fn message_to_openai(msg: &Message) -> serde_json::Value {
    match msg.role {
        Role::Tool => serde_json::json!({
            "role": "tool",
            "tool_call_id": msg.tool_call_id,
            "content": msg.text(),
        }),
        Role::Assistant if msg.has_tool_calls() => {
            let tool_calls: Vec<serde_json::Value> = msg
                .tool_calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.id,
                        "type": tc.kind,
                        "function": {
                            "name": tc.function.name,
                            "arguments": tc.function.arguments,
                        }
                    })
                })
                .collect();
            serde_json::json!({
                "role": "assistant",
                "content": msg.content,
                "tool_calls": tool_calls,
            })
        }
        role => serde_json::json!({
            "role": role.to_string(),
            "content": msg.text(),
        }),
    }
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    delta: MessageDelta,
}
