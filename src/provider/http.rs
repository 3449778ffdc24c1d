//! Shared HTTP client, SSE parsing, and auth utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::SwarmError;

/// Build a reqwest client with the given request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SwarmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(SwarmError::Network)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Parse an SSE "data:" line, returning None for "[DONE]".
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Byte buffer that hands out complete SSE lines.
///
/// A line is decoded only once its newline has arrived, so a multi-byte
/// character split across network chunks is reassembled before decoding.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buf: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete line, trimmed; `None` until a newline is buffered.
    pub fn next_line(&mut self) -> Option<Result<String, SwarmError>> {
        let end = self.buf.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.buf.drain(..=end).collect();
        Some(decode_line(&line[..end]))
    }

    /// Whatever is left once the body ends without a final newline.
    pub fn finish(self) -> Result<String, SwarmError> {
        decode_line(&self.buf)
    }
}

fn decode_line(bytes: &[u8]) -> Result<String, SwarmError> {
    std::str::from_utf8(bytes)
        .map(|line| line.trim().to_string())
        .map_err(|e| SwarmError::Stream(format!("invalid UTF-8 in event stream: {e}")))
}

/// Map a non-success HTTP status into an error.
pub fn status_to_error(status: u16, body: &str) -> SwarmError {
    match status {
        401 | 403 => SwarmError::Authentication(body.to_string()),
        429 => SwarmError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => SwarmError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
