//! Logging middleware that records step enter/exit around each node.run call.

use async_trait::async_trait;
use stepgraph::graph::StepFn;
use stepgraph::{AgentError, NodeMiddleware, StepInput, StepOutcome};

/// Middleware that logs step enter/exit around each node.run call.
///
/// Logs through `tracing` (stderr in the binary) so the REPL transcript on stdout stays clean.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        input: StepInput,
        inner: StepFn,
    ) -> Result<StepOutcome, AgentError> {
        tracing::info!(node = node_id, messages = input.messages.len(), "[node] enter");
        let result = inner(input).await;
        match &result {
            Ok(StepOutcome::Delta(delta)) => {
                tracing::info!(node = node_id, delta = delta.len(), "[node] exit")
            }
            Ok(StepOutcome::Interrupt(request)) => {
                tracing::info!(node = node_id, payload = %request.payload, "[node] exit interrupt")
            }
            Err(e) => tracing::info!(node = node_id, error = %e, "[node] exit error"),
        }
        result
    }
}
