//! Shared steps for the state_graph integration tests.

use async_trait::async_trait;
use stepgraph::{AgentError, Message, Node, StepInput, StepOutcome};

/// Appends one assistant message with a fixed text.
pub struct Say(pub &'static str);

#[async_trait]
impl Node for Say {
    fn id(&self) -> &str {
        self.0
    }

    async fn run(&self, _input: StepInput) -> Result<StepOutcome, AgentError> {
        Ok(StepOutcome::Delta(vec![Message::assistant(self.0)]))
    }
}

/// Replies with the content of the last message.
pub struct EchoLast;

#[async_trait]
impl Node for EchoLast {
    fn id(&self) -> &str {
        "echo"
    }

    async fn run(&self, input: StepInput) -> Result<StepOutcome, AgentError> {
        let text = input
            .last_message()
            .map(|m| m.content().to_string())
            .unwrap_or_default();
        Ok(StepOutcome::Delta(vec![Message::assistant(text)]))
    }
}

/// Asks "Approve?" and records the decision.
pub struct Approve;

#[async_trait]
impl Node for Approve {
    fn id(&self) -> &str {
        "approve"
    }

    async fn run(&self, mut input: StepInput) -> Result<StepOutcome, AgentError> {
        let decision = match input.await_decision("Approve?") {
            Ok(d) => d,
            Err(request) => return Ok(StepOutcome::Interrupt(request)),
        };
        Ok(StepOutcome::Delta(vec![Message::assistant(format!(
            "approved: {}",
            decision
        ))]))
    }
}

/// Needs two decisions in one step: first "First?", then "Second?".
pub struct DoubleApprove;

#[async_trait]
impl Node for DoubleApprove {
    fn id(&self) -> &str {
        "double"
    }

    async fn run(&self, mut input: StepInput) -> Result<StepOutcome, AgentError> {
        let first = match input.await_decision("First?") {
            Ok(d) => d,
            Err(request) => return Ok(StepOutcome::Interrupt(request)),
        };
        let second = match input.await_decision("Second?") {
            Ok(d) => d,
            Err(request) => return Ok(StepOutcome::Interrupt(request)),
        };
        Ok(StepOutcome::Delta(vec![Message::assistant(format!(
            "{} then {}",
            first, second
        ))]))
    }
}
