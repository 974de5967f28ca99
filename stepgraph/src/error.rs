//! Error types for step execution and run control.
//!
//! [`AgentError`] is what a single step returns when it cannot produce a delta or an
//! interrupt. [`RunError`] is what callers of `invoke` / `resume` / `cancel` see.

use thiserror::Error;

use crate::memory::CheckpointError;

/// Step execution error.
///
/// Returned by `Node::run` when a step fails. Collaborator failures (LLM call, tool
/// transport) are reported as `UpstreamFailure`; everything else as `ExecutionFailed`.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. malformed state, bad tool arguments).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// An external collaborator (LLM service, tool backend) failed or timed out.
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),
}

/// Error returned by the run controller (`CompiledStateGraph`).
///
/// Every variant is surfaced to the direct caller; nothing is logged and swallowed.
#[derive(Debug, Error)]
pub enum RunError {
    /// Loading or saving the checkpoint failed. The session did not advance.
    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Another invoke / resume / cancel is executing on this thread. Retry later.
    #[error("thread {0} is busy")]
    Busy(String),

    /// `resume` or `cancel` was called on a thread that is not interrupted.
    #[error("thread {0} has no pending interrupt")]
    NoPendingInterrupt(String),

    /// `invoke` was called on a thread that is waiting for a decision.
    #[error("thread {thread_id} is waiting for a decision: {payload}")]
    InterruptPending { thread_id: String, payload: String },

    /// The resume command was addressed to a different thread.
    #[error("resume command is for thread {got}, but thread {expected} was resumed")]
    ThreadMismatch { expected: String, got: String },

    /// A step failed. The session was saved with status Failed and can be re-invoked.
    #[error("step {step_id} failed: {source}")]
    Step {
        step_id: String,
        #[source]
        source: AgentError,
    },

    /// The routing loop ran more steps than allowed in one call.
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),

    /// Routing chose a step id that is not registered in the graph.
    #[error("unknown step: {0}")]
    UnknownStep(String),
}

impl RunError {
    /// True when the failure came from an external collaborator (LLM or tool backend).
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            RunError::Step {
                source: AgentError::UpstreamFailure(_),
                ..
            }
        )
    }
}
