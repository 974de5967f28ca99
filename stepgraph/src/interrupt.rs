//! Human-in-the-loop boundary: interrupt requests, resume commands, supplied decisions.
//!
//! A step that needs an external decision calls
//! [`StepInput::await_decision`](crate::graph::StepInput::await_decision). On the first run
//! no decision exists, so the step gets back an [`InterruptRequest`] and returns it as
//! `StepOutcome::Interrupt`. The controller persists the paused checkpoint and returns control
//! to the caller. Later, `resume(thread_id, ResumeCommand)` re-enters the same step with the
//! decision available, and `await_decision` returns it.
//!
//! Nothing blocks while a session is paused. The wait is the gap between two calls.

use serde::{Deserialize, Serialize};

/// A step's request to suspend until an external decision arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptRequest {
    /// Step that suspended; resume re-enters it.
    pub step_id: String,
    /// Text shown to the external decider.
    pub payload: String,
}

impl InterruptRequest {
    pub fn new(step_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            payload: payload.into(),
        }
    }
}

/// Decision supplied from outside to unblock an interrupted session.
///
/// When `thread_id` is set, `resume` rejects the command for any other thread with
/// `RunError::ThreadMismatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeCommand {
    pub decision: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl ResumeCommand {
    pub fn new(decision: impl Into<String>) -> Self {
        Self {
            decision: decision.into(),
            thread_id: None,
        }
    }

    /// Address the command to one thread.
    pub fn for_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// Decisions available to one step execution, consumed in call order.
///
/// The n-th `await_decision` call in a step gets the n-th decision. A step that awaits
/// twice therefore interrupts twice and is resumed twice; the first decision is replayed
/// from the checkpoint on the second resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decisions {
    values: Vec<String>,
    cursor: usize,
}

impl Decisions {
    pub fn new(values: Vec<String>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Takes the next unconsumed decision, if any.
    pub fn next_decision(&mut self) -> Option<String> {
        let value = self.values.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(value)
    }

    /// All decisions supplied for this execution (consumed or not).
    pub fn supplied(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
