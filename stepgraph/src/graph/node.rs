//! Step (node) trait and its input/output types.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::interrupt::{Decisions, InterruptRequest};
use crate::message::Message;

/// What a step sees: a snapshot of the session history plus any decisions supplied by resume.
#[derive(Debug, Clone)]
pub struct StepInput {
    /// Id of the step being run.
    pub step_id: String,
    /// Session history before this step.
    pub messages: Vec<Message>,
    decisions: Decisions,
}

impl StepInput {
    pub fn new(step_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            step_id: step_id.into(),
            messages,
            decisions: Decisions::default(),
        }
    }

    /// Input for re-entering an interrupted step with the decisions supplied so far.
    pub fn with_decisions(mut self, decisions: Vec<String>) -> Self {
        self.decisions = Decisions::new(decisions);
        self
    }

    /// Asks the outside world for a decision.
    ///
    /// Returns the decision when the step is being resumed. Otherwise returns the
    /// [`InterruptRequest`] the step must hand back as [`StepOutcome::Interrupt`]:
    ///
    /// ```rust,ignore
    /// let decision = match input.await_decision("Approve?") {
    ///     Ok(d) => d,
    ///     Err(request) => return Ok(StepOutcome::Interrupt(request)),
    /// };
    /// ```
    pub fn await_decision(&mut self, payload: impl Into<String>) -> Result<String, InterruptRequest> {
        self.decisions
            .next_decision()
            .ok_or_else(|| InterruptRequest::new(self.step_id.clone(), payload))
    }

    /// Decisions supplied to this execution, in order.
    pub fn supplied_decisions(&self) -> &[String] {
        self.decisions.supplied()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Result of one step: a delta to append, or a request to suspend. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Delta(Vec<Message>),
    Interrupt(InterruptRequest),
}

/// One unit of work in a graph.
///
/// Steps hold no persistent state. A step that interrupts must be safe to run again: on
/// resume it is re-entered with the same history and the decision now available, so any
/// branching after the interrupt must depend only on the decision value.
///
/// **Interaction**: Registered with `StateGraph::add_node` (any id) or `StateGraph::add_step`
/// (under `id()`); run by `StepExecutor`, which logs `id()` next to the registered step id.
#[async_trait]
pub trait Node: Send + Sync {
    /// Default step id for this node.
    fn id(&self) -> &str;

    async fn run(&self, input: StepInput) -> Result<StepOutcome, AgentError>;
}
