//! Configuration types for running the stock desk agent.
//!
//! Re-exports [`StoreConfig`], [`RunConfig`], [`RunOptions`] and config [`Error`].

mod run_config;
mod run_options;
mod store_config;

pub use run_config::{Error, RunConfig, DEFAULT_THREAD_ID};
pub use run_options::RunOptions;
pub use store_config::StoreConfig;
