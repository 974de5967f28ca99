//! Streaming types for graph runs.
//!
//! Events emitted by `CompiledStateGraph::stream` and `stream_resume`, one per step
//! boundary, followed by a terminal `Done` or `Error`.

use crate::error::RunError;
use crate::graph::RunOutcome;
use crate::interrupt::InterruptRequest;
use crate::message::Message;

/// Streamed event emitted while running a graph.
#[derive(Clone, Debug)]
pub enum StreamEvent {
    /// A step completed and its delta was checkpointed.
    Updates { step_id: String, delta: Vec<Message> },
    /// A step paused the run; the session is checkpointed as Interrupted.
    Interrupt(InterruptRequest),
    /// Final event of a successful call.
    Done(RunOutcome),
    /// Final event of a failed call (the `RunError` rendered as text).
    Error(String),
}

impl StreamEvent {
    pub(crate) fn finished(result: Result<RunOutcome, RunError>) -> Self {
        match result {
            Ok(outcome) => StreamEvent::Done(outcome),
            Err(e) => StreamEvent::Error(e.to_string()),
        }
    }

    /// True for `Done` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done(_) | StreamEvent::Error(_))
    }
}
