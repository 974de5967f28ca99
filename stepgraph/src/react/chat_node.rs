//! Chat node: read messages, call LLM, append one assistant message.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Node, StepInput, StepOutcome};
use crate::llm::LlmClient;
use crate::message::Message;

/// Chat node: one LLM turn.
///
/// Passes the full session history to the LLM (prefixed with the optional system prompt,
/// which is not stored in the session) and returns the response as one assistant message,
/// carrying any requested tool calls. LLM failures propagate as `UpstreamFailure`.
///
/// **Interaction**: Implements `Node`; consumes `LlmClient` (e.g. MockLlm).
pub struct ChatNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: Option<String>,
}

impl ChatNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

#[async_trait]
impl Node for ChatNode {
    fn id(&self) -> &str {
        super::CHAT_NODE
    }

    async fn run(&self, input: StepInput) -> Result<StepOutcome, AgentError> {
        let response = match &self.system_prompt {
            Some(prompt) => {
                let mut history = Vec::with_capacity(input.messages.len() + 1);
                history.push(Message::system(prompt.clone()));
                history.extend(input.messages.iter().cloned());
                self.llm.invoke(&history).await?
            }
            None => self.llm.invoke(&input.messages).await?,
        };
        debug!(
            step_id = %input.step_id,
            tool_calls = response.tool_calls.len(),
            "LLM responded"
        );
        Ok(StepOutcome::Delta(vec![response.into_message()]))
    }
}
