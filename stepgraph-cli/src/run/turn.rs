//! One conversational turn: send a message or a decision, stream the run, report the outcome.

use std::io::Write;

use stepgraph::{CompiledStateGraph, Message, ResumeCommand, RunOutcome, StreamEvent};
use tokio_stream::StreamExt;

use super::Error;

/// What the user supplied for this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnInput {
    /// New user message; invokes the graph.
    Message(String),
    /// Answer to the pending approval; resumes the graph.
    Decision(String),
}

/// Runs one turn on `thread_id`, writing `[Calling tool: ...]` lines to `out` as tool calls
/// are checkpointed. Returns the outcome; does not print it (see [`render_outcome`]).
pub async fn run_turn<W: Write>(
    graph: &CompiledStateGraph,
    thread_id: &str,
    input: TurnInput,
    out: &mut W,
) -> Result<RunOutcome, Error> {
    let mut events = match input {
        TurnInput::Message(text) => graph.stream(thread_id, vec![Message::user(text)]),
        TurnInput::Decision(decision) => graph.stream_resume(
            thread_id,
            ResumeCommand::new(decision).for_thread(thread_id),
        ),
    };

    while let Some(event) = events.next().await {
        match event {
            StreamEvent::Updates { step_id, delta } => {
                tracing::debug!(step = %step_id, delta = delta.len(), "step checkpointed");
                for call in delta.iter().flat_map(|m| m.tool_calls()) {
                    writeln!(out, "[Calling tool: {}]", call.name)?;
                }
            }
            StreamEvent::Interrupt(request) => {
                tracing::debug!(step = %request.step_id, "run interrupted");
            }
            StreamEvent::Done(outcome) => return Ok(outcome),
            StreamEvent::Error(message) => return Err(message.into()),
        }
    }
    Err("run ended without a result".into())
}

/// Text shown to the user for an outcome: the assistant's reply, or the approval question.
pub fn render_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Interrupted { interrupt, .. } => format!("Approval needed: {}", interrupt.payload),
        RunOutcome::Completed { .. } => format!(
            "Assistant: {}",
            outcome.last_assistant_content().unwrap_or_default()
        ),
    }
}
