//! Conditional routing: branch on state, loop until a condition holds.

use std::sync::Arc;

use stepgraph::{Message, Next, StateGraph, END, START};

use crate::common::Say;

/// Routes to "positive" or "negative" depending on the last user message.
fn sentiment_router(state: &[Message], _delta: &[Message]) -> Next {
    let last_user = state
        .iter()
        .rev()
        .find(|m| m.role() == "user")
        .map(|m| m.content().to_lowercase())
        .unwrap_or_default();
    if last_user.contains("good") {
        Next::node("positive")
    } else {
        Next::node("negative")
    }
}

fn branching_graph() -> stepgraph::CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph.add_node("classify", Arc::new(Say("classified")));
    graph.add_node("positive", Arc::new(Say("glad to hear")));
    graph.add_node("negative", Arc::new(Say("sorry to hear")));
    graph.add_edge(START, "classify");
    graph.add_conditional_edges("classify", sentiment_router);
    graph.add_edge("positive", END);
    graph.add_edge("negative", END);
    graph.compile().unwrap()
}

/// **Scenario**: The router picks the branch from the state; only that branch runs.
#[tokio::test]
async fn conditional_edges_pick_branch() {
    let graph = branching_graph();
    let out = graph
        .invoke("a", vec![Message::user("a good day")])
        .await
        .unwrap();
    assert_eq!(out.last_assistant_content(), Some("glad to hear"));
    assert_eq!(out.messages().len(), 3);

    let out = graph
        .invoke("b", vec![Message::user("a bad day")])
        .await
        .unwrap();
    assert_eq!(out.last_assistant_content(), Some("sorry to hear"));
}

/// **Scenario**: A loop edge runs until the router ends it.
#[tokio::test]
async fn loop_until_router_ends() {
    let mut graph = StateGraph::new();
    graph.add_node("tick", Arc::new(Say("tick")));
    graph.add_edge(START, "tick");
    graph.add_conditional_edges("tick", |state: &[Message], _delta: &[Message]| {
        let ticks = state.iter().filter(|m| m.content() == "tick").count();
        if ticks < 3 {
            Next::node("tick")
        } else {
            Next::End
        }
    });
    let graph = graph.compile().unwrap();

    let out = graph.invoke("t", vec![]).await.unwrap();
    assert_eq!(out.messages().len(), 3);
}
