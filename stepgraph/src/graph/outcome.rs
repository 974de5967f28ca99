//! Result of a successful invoke / resume call.

use serde::{Deserialize, Serialize};

use crate::interrupt::InterruptRequest;
use crate::message::Message;

/// How a call ended. Errors are reported separately as `RunError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Routing reached END.
    Completed { messages: Vec<Message> },
    /// A step is waiting for a decision; call `resume` or `cancel`.
    Interrupted {
        interrupt: InterruptRequest,
        messages: Vec<Message>,
    },
}

impl RunOutcome {
    /// Full session history at the end of the call.
    pub fn messages(&self) -> &[Message] {
        match self {
            RunOutcome::Completed { messages } | RunOutcome::Interrupted { messages, .. } => {
                messages
            }
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }

    /// Content of the newest assistant message, if any.
    pub fn last_assistant_content(&self) -> Option<&str> {
        self.messages()
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .map(|m| m.content())
    }

    pub fn interrupt(&self) -> Option<&InterruptRequest> {
        match self {
            RunOutcome::Interrupted { interrupt, .. } => Some(interrupt),
            RunOutcome::Completed { .. } => None,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted { .. })
    }
}
