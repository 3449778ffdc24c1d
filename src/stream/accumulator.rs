//! Merge streamed fragments into one assistant message.

use crate::types::{FunctionCall, Message, MessageDelta, Role, ToolCall, ToolCallDelta};

/// Builds one assistant message out of [`MessageDelta`]s.
///
/// Role and sender are fixed when the accumulator is created; fragment
/// roles are ignored. Text fields are appended in arrival order. Tool-call
/// fragments land on the slot named by their `index`, or on their position
/// in the fragment list when the provider omits it.
#[derive(Debug, Clone)]
pub struct DeltaAccumulator {
    sender: String,
    content: Option<String>,
    tool_calls: Vec<ToolCall>,
}

impl DeltaAccumulator {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: None,
            tool_calls: Vec::new(),
        }
    }

    /// Fold one fragment into the message.
    pub fn push(&mut self, delta: &MessageDelta) {
        if let Some(ref text) = delta.content {
            self.content.get_or_insert_with(String::new).push_str(text);
        }

        if let Some(ref fragments) = delta.tool_calls {
            for (position, fragment) in fragments.iter().enumerate() {
                let slot = fragment.index.unwrap_or(position);
                self.merge_tool_call(slot, fragment);
            }
        }
    }

    fn merge_tool_call(&mut self, slot: usize, fragment: &ToolCallDelta) {
        while self.tool_calls.len() <= slot {
            self.tool_calls.push(ToolCall {
                id: String::new(),
                kind: String::new(),
                function: FunctionCall::default(),
            });
        }
        let call = &mut self.tool_calls[slot];

        if let Some(ref id) = fragment.id {
            call.id.push_str(id);
        }
        if let Some(ref kind) = fragment.kind {
            call.kind.push_str(kind);
        }
        if let Some(ref function) = fragment.function {
            if let Some(ref name) = function.name {
                call.function.name.push_str(name);
            }
            if let Some(ref arguments) = function.arguments {
                call.function.arguments.push_str(arguments);
            }
        }
    }

    /// Current text, for progress display.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.tool_calls
    }

    /// Finish the message.
    pub fn finish(self) -> Message {
        let tool_calls = self
            .tool_calls
            .into_iter()
            .map(|mut call| {
                if call.kind.is_empty() {
                    call.kind = "function".to_string();
                }
                call
            })
            .collect();
        Message {
            role: Role::Assistant,
            content: self.content,
            sender: Some(self.sender),
            tool_calls,
            tool_call_id: None,
            tool_name: None,
        }
    }
}
