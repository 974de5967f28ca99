//! Routing decision after a step completes.

/// Where the run goes after a step produced its delta.
///
/// Returned by routing functions registered with
/// [`StateGraph::add_conditional_edges`](super::StateGraph::add_conditional_edges);
/// fixed edges resolve to the same type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Run the step with this id next.
    Node(String),
    /// Finish the run; the session becomes Completed.
    End,
}

impl Next {
    pub fn node(id: impl Into<String>) -> Self {
        Next::Node(id.into())
    }
}
