//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when routes reference unknown nodes, the entry edge is
//! missing, or a node has no (or more than one) outgoing route.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// A node has more than one outgoing edge or conditional route.
    #[error("node {0} has more than one outgoing route")]
    DuplicateRoute(String),

    /// A registered node has no outgoing edge or conditional route.
    #[error("node {0} has no outgoing route")]
    MissingRoute(String),
}
