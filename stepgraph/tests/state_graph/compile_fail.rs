//! StateGraph compile failure cases: unknown node, missing entry, missing or duplicate route.

use std::sync::Arc;

use stepgraph::{CompilationError, Next, StateGraph, END, START};

use crate::common::Say;

#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_edge("a", END);

    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

#[test]
fn compile_fails_with_two_start_edges() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_node("b", Arc::new(Say("b")));
    graph.add_edge(START, "a");
    graph.add_edge(START, "b");
    graph.add_edge("a", END);
    graph.add_edge("b", END);

    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

#[test]
fn compile_fails_when_node_has_no_route() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_node("b", Arc::new(Say("b")));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);

    match graph.compile() {
        Err(CompilationError::MissingRoute(id)) => assert_eq!(id, "b"),
        other => panic!("expected MissingRoute, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_when_node_has_edge_and_router() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.add_conditional_edges("a", |_, _| Next::End);

    match graph.compile() {
        Err(CompilationError::DuplicateRoute(id)) => assert_eq!(id, "a"),
        other => panic!("expected DuplicateRoute, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_when_router_source_is_unknown() {
    let mut graph = StateGraph::new();
    graph.add_node("a", Arc::new(Say("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.add_conditional_edges("ghost", |_, _| Next::End);

    assert!(matches!(
        graph.compile(),
        Err(CompilationError::NodeNotFound(id)) if id == "ghost"
    ));
}
