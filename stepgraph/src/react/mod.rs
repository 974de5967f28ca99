//! Prebuilt chat / tool nodes and the routing helper between them.
//!
//! The usual tool-using chat loop is
//! `START → chatbot → tools_condition → {tools → chatbot, END}`:
//!
//! ```rust,ignore
//! let mut graph = StateGraph::new();
//! graph.add_step(Arc::new(ChatNode::new(llm)));      // registered as CHAT_NODE
//! graph.add_step(Arc::new(ToolNode::new(registry))); // registered as TOOLS_NODE
//! graph.add_edge(START, CHAT_NODE);
//! graph.add_conditional_edges(CHAT_NODE, tools_condition);
//! graph.add_edge(TOOLS_NODE, CHAT_NODE);
//! ```

mod chat_node;
mod condition;
mod tool_node;

pub use chat_node::ChatNode;
pub use condition::tools_condition;
pub use tool_node::{HandleToolErrors, ToolNode, DEFAULT_TOOL_ERROR_TEMPLATE};

/// Conventional id of the chat step.
pub const CHAT_NODE: &str = "chatbot";

/// Id `tools_condition` routes to when tool calls are requested.
pub const TOOLS_NODE: &str = "tools";
