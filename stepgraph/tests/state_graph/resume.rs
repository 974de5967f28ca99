//! Interrupt / resume / cancel through the public API.

use std::sync::Arc;

use stepgraph::{
    InterruptRequest, Message, ResumeCommand, RunError, SessionStatus, StateGraph, END, START,
};

use crate::common::{Approve, DoubleApprove, Say};

fn approval_graph() -> stepgraph::CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph.add_node("prepare", Arc::new(Say("prepare")));
    graph.add_node("approve", Arc::new(Approve));
    graph.add_node("finish", Arc::new(Say("finish")));
    graph.add_edge(START, "prepare");
    graph.add_edge("prepare", "approve");
    graph.add_edge("approve", "finish");
    graph.add_edge("finish", END);
    graph.compile().unwrap()
}

/// **Scenario**: Resume continues after the interrupted step; earlier steps are not re-run.
#[tokio::test]
async fn resume_runs_remaining_steps_once() {
    let graph = approval_graph();
    let paused = graph.invoke("t", vec![Message::user("go")]).await.unwrap();
    assert_eq!(
        paused.interrupt(),
        Some(&InterruptRequest::new("approve", "Approve?"))
    );

    let done = graph.resume("t", ResumeCommand::new("yes")).await.unwrap();
    let contents: Vec<&str> = done.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["go", "prepare", "approved: yes", "finish"]);
}

/// **Scenario**: A step awaiting two decisions interrupts twice; the first decision is replayed.
#[tokio::test]
async fn step_with_two_decisions_is_resumed_twice() {
    let mut graph = StateGraph::new();
    graph.add_node("double", Arc::new(DoubleApprove));
    graph.add_edge(START, "double");
    graph.add_edge("double", END);
    let graph = graph.compile().unwrap();

    let out = graph.invoke("t", vec![]).await.unwrap();
    assert_eq!(out.interrupt().map(|i| i.payload.as_str()), Some("First?"));

    let out = graph.resume("t", ResumeCommand::new("a")).await.unwrap();
    assert_eq!(out.interrupt().map(|i| i.payload.as_str()), Some("Second?"));
    let cp = graph.get_state("t").await.unwrap().unwrap();
    assert_eq!(cp.resume_values, vec!["a".to_string()]);

    let out = graph.resume("t", ResumeCommand::new("b")).await.unwrap();
    assert_eq!(out.last_assistant_content(), Some("a then b"));
    let cp = graph.get_state("t").await.unwrap().unwrap();
    assert!(cp.resume_values.is_empty());
}

/// **Scenario**: Addressed commands for the right thread are accepted.
#[tokio::test]
async fn addressed_command_for_same_thread_is_accepted() {
    let graph = approval_graph();
    graph.invoke("buy_thread", vec![]).await.unwrap();
    let out = graph
        .resume("buy_thread", ResumeCommand::new("no").for_thread("buy_thread"))
        .await
        .unwrap();
    assert_eq!(out.messages().len(), 3);
}

/// **Scenario**: Rejected resume and cancel calls leave the session untouched.
#[tokio::test]
async fn rejected_calls_do_not_change_state() {
    let graph = approval_graph();
    graph.invoke("done", vec![]).await.unwrap();
    graph.resume("done", ResumeCommand::new("yes")).await.unwrap();
    let before = graph.get_state("done").await.unwrap().unwrap();
    assert_eq!(before.status, SessionStatus::Completed);

    assert!(matches!(
        graph.resume("done", ResumeCommand::new("yes")).await,
        Err(RunError::NoPendingInterrupt(_))
    ));
    assert!(matches!(
        graph.cancel("done").await,
        Err(RunError::NoPendingInterrupt(_))
    ));
    assert_eq!(graph.get_state("done").await.unwrap().unwrap(), before);
}

/// **Scenario**: A cancelled session keeps its history and no pending step.
#[tokio::test]
async fn cancel_keeps_history() {
    let graph = approval_graph();
    graph.invoke("t", vec![Message::user("go")]).await.unwrap();
    let cp = graph.cancel("t").await.unwrap();
    assert_eq!(cp.status, SessionStatus::Cancelled);
    assert!(cp.pending_step_id.is_none());
    assert_eq!(cp.messages.len(), 2);
}
