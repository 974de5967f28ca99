//! Routing helper for chat → tools loops.

use crate::graph::Next;
use crate::message::Message;

use super::TOOLS_NODE;

/// Routes to [`TOOLS_NODE`] when the step's last delta message requests tool calls,
/// otherwise ends the run.
///
/// Signature matches `StateGraph::add_conditional_edges`.
pub fn tools_condition(_state: &[Message], delta: &[Message]) -> Next {
    match delta.last() {
        Some(last) if !last.tool_calls().is_empty() => Next::node(TOOLS_NODE),
        _ => Next::End,
    }
}
