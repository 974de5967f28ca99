//! invoke: output, history concatenation across calls, persisted status.

use std::sync::Arc;

use stepgraph::{Message, RunOutcome, SessionStatus, StateGraph, END, START};

use crate::common::{EchoLast, Say};

/// **Scenario**: Sequential graph (node_1 → node_2 → node_3) appends one message per step.
#[tokio::test]
async fn sequential_graph_appends_in_order() {
    let mut graph = StateGraph::new();
    graph.add_node("node_1", Arc::new(Say("node_1")));
    graph.add_node("node_2", Arc::new(Say("node_2")));
    graph.add_node("node_3", Arc::new(Say("node_3")));
    graph.add_edge(START, "node_1");
    graph.add_edge("node_1", "node_2");
    graph.add_edge("node_2", "node_3");
    graph.add_edge("node_3", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled
        .invoke("seq", vec![Message::user("start")])
        .await
        .unwrap();
    let contents: Vec<&str> = out.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["start", "node_1", "node_2", "node_3"]);
}

/// **Scenario**: add_step registers a node under its own id; edges can name that id.
#[tokio::test]
async fn add_step_registers_under_node_id() {
    let mut graph = StateGraph::new();
    graph.add_step(Arc::new(Say("greet")));
    graph.add_step(Arc::new(EchoLast));
    graph.add_edge(START, "greet");
    graph.add_edge("greet", "echo");
    graph.add_edge("echo", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled.invoke("t", vec![Message::user("hi")]).await.unwrap();
    let contents: Vec<&str> = out.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["hi", "greet", "greet"]);
}

/// **Scenario**: Each invoke on a completed thread keeps prior history and appends input + deltas.
#[tokio::test]
async fn reinvoke_concatenates_history() {
    let mut graph = StateGraph::new();
    graph.add_node("echo", Arc::new(EchoLast));
    graph.add_edge(START, "echo");
    graph.add_edge("echo", END);
    let compiled = graph.compile().unwrap();

    let first = compiled.invoke("t", vec![Message::user("one")]).await.unwrap();
    let second = compiled.invoke("t", vec![Message::user("two")]).await.unwrap();

    assert!(second.messages().starts_with(first.messages()));
    assert_eq!(
        second,
        RunOutcome::Completed {
            messages: vec![
                Message::user("one"),
                Message::assistant("one"),
                Message::user("two"),
                Message::assistant("two"),
            ]
        }
    );
    let cp = compiled.get_state("t").await.unwrap().unwrap();
    assert_eq!(cp.status, SessionStatus::Completed);
    assert_eq!(cp.messages, second.messages());
}

/// **Scenario**: Threads are isolated: history of one never appears in another.
#[tokio::test]
async fn threads_are_isolated() {
    let mut graph = StateGraph::new();
    graph.add_node("echo", Arc::new(EchoLast));
    graph.add_edge(START, "echo");
    graph.add_edge("echo", END);
    let compiled = graph.compile().unwrap();

    compiled.invoke("a", vec![Message::user("for a")]).await.unwrap();
    let out = compiled.invoke("b", vec![Message::user("for b")]).await.unwrap();
    assert_eq!(out.messages().len(), 2);
    assert!(out.messages().iter().all(|m| m.content() == "for b"));
}

/// **Scenario**: Distinct threads run in parallel without Busy errors.
#[tokio::test]
async fn distinct_threads_run_concurrently() {
    let mut graph = StateGraph::new();
    graph.add_node("echo", Arc::new(EchoLast));
    graph.add_edge(START, "echo");
    graph.add_edge("echo", END);
    let compiled = graph.compile().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let g = compiled.clone();
            tokio::spawn(async move {
                g.invoke(&format!("t{}", i), vec![Message::user(format!("m{}", i))])
                    .await
            })
        })
        .collect();
    for h in handles {
        assert!(h.await.unwrap().is_ok());
    }
    assert_eq!(compiled.list_threads().await.unwrap().len(), 8);
}
