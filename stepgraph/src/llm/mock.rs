//! Mock LLM for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

use super::{LlmClient, LlmResponse};

enum Mode {
    /// Same response every call.
    Fixed(LlmResponse),
    /// Responses in order; errors once exhausted.
    Scripted(Mutex<VecDeque<LlmResponse>>),
    /// Every call fails with `UpstreamFailure`.
    Failing(String),
}

/// Mock LLM: fixed, scripted or failing. Records the history length of every call so tests
/// can check that the full session history was passed in.
pub struct MockLlm {
    mode: Mode,
    seen: Mutex<Vec<usize>>,
}

impl MockLlm {
    /// Always answers `content` with no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::fixed(LlmResponse::text(content))
    }

    pub fn fixed(response: LlmResponse) -> Self {
        Self::new(Mode::Fixed(response))
    }

    pub fn scripted(responses: impl IntoIterator<Item = LlmResponse>) -> Self {
        Self::new(Mode::Scripted(Mutex::new(responses.into_iter().collect())))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(Mode::Failing(reason.into()))
    }

    fn new(mode: Mode) -> Self {
        Self {
            mode,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// History length passed to each call, in call order.
    pub fn seen_history_lengths(&self) -> Vec<usize> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.seen_history_lengths().len()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(messages.len());
        }
        match &self.mode {
            Mode::Fixed(response) => Ok(response.clone()),
            Mode::Scripted(queue) => queue
                .lock()
                .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?
                .pop_front()
                .ok_or_else(|| AgentError::UpstreamFailure("mock script exhausted".into())),
            Mode::Failing(reason) => Err(AgentError::UpstreamFailure(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Scripted responses come back in order, then the mock reports exhaustion.
    #[tokio::test]
    async fn scripted_in_order_then_exhausted() {
        let llm = MockLlm::scripted([LlmResponse::text("one"), LlmResponse::text("two")]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "one");
        assert_eq!(llm.invoke(&[Message::user("x")]).await.unwrap().content, "two");
        assert!(matches!(
            llm.invoke(&[]).await,
            Err(AgentError::UpstreamFailure(_))
        ));
        assert_eq!(llm.seen_history_lengths(), vec![0, 1, 0]);
    }

    /// **Scenario**: A failing mock always returns UpstreamFailure with its reason.
    #[tokio::test]
    async fn failing_returns_upstream_failure() {
        let llm = MockLlm::failing("service unavailable");
        match llm.invoke(&[]).await {
            Err(AgentError::UpstreamFailure(msg)) => assert_eq!(msg, "service unavailable"),
            other => panic!("expected UpstreamFailure: {:?}", other),
        }
        assert_eq!(llm.calls(), 1);
    }
}
