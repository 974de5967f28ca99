//! LLM client abstraction for the chat node.
//!
//! `ChatNode` depends on a callable that returns assistant text and optional tool calls;
//! this module defines the trait and a mock implementation. Real providers implement
//! [`LlmClient`] outside this crate.

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};

/// Response from an LLM completion: assistant message text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; `ChatNode` turns it into one
/// assistant message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means no tools and the chat turn ends.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn into_message(self) -> Message {
        Message::assistant_with_tool_calls(self.content, self.tool_calls)
    }
}

/// LLM client: given the full history, returns assistant text and optional tool calls.
///
/// Failures (transport, timeout, provider error) are reported as
/// `AgentError::UpstreamFailure`; the run controller then persists the session as Failed.
///
/// **Interaction**: Used by `ChatNode`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content and optional tool_calls.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}
