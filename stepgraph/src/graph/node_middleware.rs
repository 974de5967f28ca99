//! Middleware that wraps each step execution.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::AgentError;

use super::node::{StepInput, StepOutcome};

/// Boxed future returned by the wrapped step.
pub type StepFuture = Pin<Box<dyn Future<Output = Result<StepOutcome, AgentError>> + Send>>;

/// Continuation that runs the wrapped step.
pub type StepFn = Box<dyn FnOnce(StepInput) -> StepFuture + Send>;

/// Wraps `Node::run`. Implementations may inspect or log input and outcome, but must call
/// `inner` at most once.
///
/// **Interaction**: Attached with `StateGraph::with_middleware`; used by `StepExecutor`.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        input: StepInput,
        inner: StepFn,
    ) -> Result<StepOutcome, AgentError>;
}
