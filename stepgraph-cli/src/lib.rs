//! stepgraph-cli library: the stock desk agent and its run loop, reusable from other crates.
//!
//! Builds `chatbot → tools` around a rule-based LLM, persists sessions per thread (in memory
//! or SQLite) and pauses `buy_stocks` until a human approves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), stepgraph_cli::Error> {
//! use stepgraph_cli::{build_stock_desk, run_turn, RunConfig, TurnInput};
//!
//! let config = RunConfig::default().with_thread_id("buy_thread");
//! let graph = build_stock_desk(&config)?;
//! let mut out = std::io::stdout();
//! let outcome = run_turn(&graph, &config.thread_id, TurnInput::Message("Buy 10 MSFT stocks".into()), &mut out).await?;
//! if let Some(request) = outcome.interrupt() {
//!     println!("{}", request.payload);
//!     run_turn(&graph, &config.thread_id, TurnInput::Decision("yes".into()), &mut out).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod agent;
mod config;
mod logging;
mod middleware;
mod run;
mod tools;

pub use agent::{stock_desk_graph, StockDeskLlm, STOCK_DESK_PROMPT};
pub use config::{Error, RunConfig, RunOptions, StoreConfig, DEFAULT_THREAD_ID};
pub use logging::init_tracing;
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use run::{
    build_checkpointer, build_stock_desk, build_stock_desk_with_llm, config_summary, execute,
    print_config_summary, render_outcome, repl, run_turn, Command, TurnInput,
};
pub use stepgraph::{Message, RunOutcome};
pub use tools::{price_of, stock_desk_tools, BuyStocks, GetStockPrice};

#[cfg(test)]
mod tests;
