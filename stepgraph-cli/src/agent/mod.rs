//! Stock desk agent: a chatbot that looks up prices and buys shares after approval.
//!
//! Graph: `START → chatbot → tools_condition → {tools → chatbot, END}`. The `buy_stocks`
//! tool interrupts the `tools` step until a human answers the approval question.

mod llm;

pub use llm::StockDeskLlm;

use std::sync::Arc;

use stepgraph::{
    tools_condition, ChatNode, LlmClient, StateGraph, ToolNode, CHAT_NODE, START, TOOLS_NODE,
};

use crate::tools::stock_desk_tools;

/// System prompt prepended to every chat turn. Not stored in the session.
pub const STOCK_DESK_PROMPT: &str =
    "You are a stock desk assistant. Use get_stock_price to look up prices and buy_stocks to buy shares.";

/// Builds the (uncompiled) stock desk graph around `llm`.
pub fn stock_desk_graph(llm: Arc<dyn LlmClient>) -> StateGraph {
    let chat = ChatNode::new(llm).with_system_prompt(STOCK_DESK_PROMPT);
    let tools = ToolNode::new(stock_desk_tools());

    let mut graph = StateGraph::new();
    graph.add_step(Arc::new(chat));
    graph.add_step(Arc::new(tools));
    graph.add_edge(START, CHAT_NODE);
    graph.add_conditional_edges(CHAT_NODE, tools_condition);
    graph.add_edge(TOOLS_NODE, CHAT_NODE);
    graph
}

