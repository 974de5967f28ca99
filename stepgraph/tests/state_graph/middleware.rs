//! Node middleware wraps every step execution.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stepgraph::graph::StepFn;
use stepgraph::{AgentError, Message, NodeMiddleware, StateGraph, StepInput, StepOutcome, END, START};

use crate::common::{Approve, Say};

#[derive(Default)]
struct RecordingMiddleware {
    log: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware for RecordingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        input: StepInput,
        inner: StepFn,
    ) -> Result<StepOutcome, AgentError> {
        self.log.lock().unwrap().push(format!("before {}", node_id));
        let outcome = inner(input).await;
        let kind = match &outcome {
            Ok(StepOutcome::Delta(_)) => "delta",
            Ok(StepOutcome::Interrupt(_)) => "interrupt",
            Err(_) => "error",
        };
        self.log
            .lock()
            .unwrap()
            .push(format!("after {} {}", node_id, kind));
        outcome
    }
}

/// **Scenario**: Middleware sees each step by its registered id, including interrupts.
#[tokio::test]
async fn middleware_wraps_each_step() {
    let mw = Arc::new(RecordingMiddleware::default());
    let mut graph = StateGraph::new().with_middleware(mw.clone());
    graph.add_node("first", Arc::new(Say("first")));
    graph.add_node("approve", Arc::new(Approve));
    graph.add_edge(START, "first");
    graph.add_edge("first", "approve");
    graph.add_edge("approve", END);
    let graph = graph.compile().unwrap();

    graph.invoke("t", vec![Message::user("go")]).await.unwrap();
    assert_eq!(
        *mw.log.lock().unwrap(),
        vec![
            "before first",
            "after first delta",
            "before approve",
            "after approve interrupt"
        ]
    );
}
