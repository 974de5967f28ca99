//! Run entry points: build the stock desk graph from config, run one turn, or drive a REPL.
//!
//! Re-exports [`build_stock_desk`], [`run_turn`], [`repl`], [`execute`] and [`Error`].

pub use crate::config::Error;

mod checkpointer;
mod command;
mod config_summary;
mod repl;
mod turn;

use std::sync::Arc;

use stepgraph::{CompiledStateGraph, LlmClient};

use crate::agent::{stock_desk_graph, StockDeskLlm};
use crate::config::RunConfig;
use crate::middleware::WithNodeLogging;

pub use checkpointer::build_checkpointer;
pub use command::{execute, Command};
pub use config_summary::{config_summary, print_config_summary};
pub use repl::repl;
pub use turn::{render_outcome, run_turn, TurnInput};

/// Compiles the stock desk graph with the rule-based [`StockDeskLlm`].
pub fn build_stock_desk(config: &RunConfig) -> Result<CompiledStateGraph, Error> {
    build_stock_desk_with_llm(config, Arc::new(StockDeskLlm::new()))
}

/// Compiles the stock desk graph around `llm`, with the checkpointer, step limit and node
/// logging taken from `config`.
pub fn build_stock_desk_with_llm(
    config: &RunConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<CompiledStateGraph, Error> {
    let checkpointer = build_checkpointer(&config.store)?;
    let mut graph = stock_desk_graph(llm).with_step_limit(config.step_limit);
    if config.verbose {
        graph = graph.with_node_logging();
    }
    Ok(graph.compile_with_checkpointer(checkpointer)?)
}
