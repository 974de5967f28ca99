//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run control (start, complete, interrupt, error) and for
//! single step execution.

use crate::error::{AgentError, RunError};

use super::node::StepOutcome;

/// Log the start of an invoke / resume / cancel call.
pub fn log_run_start(thread_id: &str, operation: &str) {
    tracing::info!(thread_id = thread_id, operation = operation, "Starting run");
}

/// Log a run that reached END.
pub fn log_run_complete(thread_id: &str, messages: usize) {
    tracing::info!(thread_id = thread_id, messages = messages, "Run complete");
}

/// Log a run that paused waiting for a decision.
pub fn log_run_interrupt(thread_id: &str, step_id: &str) {
    tracing::info!(thread_id = thread_id, step_id = step_id, "Run interrupted");
}

/// Log a run that returned an error to the caller.
pub fn log_run_error(thread_id: &str, error: &RunError) {
    tracing::error!(thread_id = thread_id, %error, "Run failed");
}

/// Log step execution start.
pub fn log_step_start(step_id: &str, node: &str) {
    tracing::debug!(step_id = step_id, node = node, "Starting step execution");
}

/// Log step completion with the kind of outcome.
pub fn log_step_complete(step_id: &str, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Delta(delta) => {
            tracing::debug!(step_id = step_id, delta = delta.len(), "Step execution complete")
        }
        StepOutcome::Interrupt(request) => tracing::debug!(
            step_id = step_id,
            payload = %request.payload,
            "Step requested interrupt"
        ),
    }
}

pub fn log_step_error(step_id: &str, error: &AgentError) {
    tracing::warn!(step_id = step_id, %error, "Step execution failed");
}
