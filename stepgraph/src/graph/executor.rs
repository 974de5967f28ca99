//! Runs exactly one step, optionally wrapped by node middleware.

use std::sync::Arc;

use crate::error::AgentError;

use super::logging::{log_step_complete, log_step_error, log_step_start};
use super::node::{Node, StepInput, StepOutcome};
use super::node_middleware::{NodeMiddleware, StepFuture};

/// Executes a single step. Never retries; determinism is the step's contract.
///
/// **Interaction**: Owned by `CompiledStateGraph`; one call per step boundary.
#[derive(Clone, Default)]
pub struct StepExecutor {
    middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl StepExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_middleware(middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
        }
    }

    /// Runs `node` with `input`. The step id logged and passed to middleware is
    /// `input.step_id`, the id the node is registered under; `Node::id` is logged alongside
    /// as the node's kind.
    pub async fn run(
        &self,
        node: Arc<dyn Node>,
        input: StepInput,
    ) -> Result<StepOutcome, AgentError> {
        let step_id = input.step_id.clone();
        log_step_start(&step_id, node.id());

        let result = match &self.middleware {
            Some(middleware) => {
                middleware
                    .around_run(
                        &step_id,
                        input,
                        Box::new(move |input: StepInput| -> StepFuture {
                            Box::pin(async move { node.run(input).await })
                        }),
                    )
                    .await
            }
            None => node.run(input).await,
        };

        match &result {
            Ok(outcome) => log_step_complete(&step_id, outcome),
            Err(e) => log_step_error(&step_id, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::graph::node_middleware::StepFn;
    use crate::message::Message;

    struct Echo;

    #[async_trait]
    impl Node for Echo {
        fn id(&self) -> &str {
            "echo"
        }

        async fn run(&self, input: StepInput) -> Result<StepOutcome, AgentError> {
            let text = input.last_message().map(|m| m.content().to_string()).unwrap_or_default();
            Ok(StepOutcome::Delta(vec![Message::assistant(text)]))
        }
    }

    struct Recording(Mutex<Vec<String>>);

    #[async_trait]
    impl NodeMiddleware for Recording {
        async fn around_run(
            &self,
            node_id: &str,
            input: StepInput,
            inner: StepFn,
        ) -> Result<StepOutcome, AgentError> {
            self.0.lock().unwrap().push(format!("enter {}", node_id));
            let out = inner(input).await;
            self.0.lock().unwrap().push(format!("exit {}", node_id));
            out
        }
    }

    /// **Scenario**: Without middleware the node runs directly.
    #[tokio::test]
    async fn runs_node_without_middleware() {
        let out = StepExecutor::new()
            .run(Arc::new(Echo), StepInput::new("echo", vec![Message::user("hi")]))
            .await
            .unwrap();
        assert_eq!(out, StepOutcome::Delta(vec![Message::assistant("hi")]));
    }

    /// **Scenario**: Middleware wraps the node exactly once, enter before exit.
    #[tokio::test]
    async fn middleware_wraps_node() {
        let rec = Arc::new(Recording(Mutex::new(vec![])));
        let exec = StepExecutor::with_middleware(rec.clone());
        exec.run(Arc::new(Echo), StepInput::new("step_a", vec![]))
            .await
            .unwrap();
        assert_eq!(*rec.0.lock().unwrap(), vec!["enter step_a", "exit step_a"]);
    }
}
