//! Run config: thread, checkpoint store, step limit, verbosity. Filled from env / .env.
//!
//! Interacts with [`StoreConfig`](super::StoreConfig), [`RunOptions`](super::RunOptions) and
//! `build_stock_desk` in run.

use stepgraph::DEFAULT_STEP_LIMIT;

use super::{RunOptions, StoreConfig};

/// Error type used for config loading and CLI runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Thread used when neither `THREAD_ID` nor `--thread-id` is given.
pub const DEFAULT_THREAD_ID: &str = "default";

/// Run config. Can be filled from env vars (and .env).
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Session id; sessions with the same id share history and pending interrupts.
    pub thread_id: String,
    /// Checkpoint store. In-memory unless `DB_PATH` is set.
    pub store: StoreConfig,
    /// Steps per invoke / resume before the run is stopped.
    pub step_limit: usize,
    /// When true, show debug logs (step enter/exit, run control).
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_id: DEFAULT_THREAD_ID.to_string(),
            store: StoreConfig::InMemory,
            step_limit: DEFAULT_STEP_LIMIT,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Fill config from env vars. Requires `dotenv::dotenv().ok()` beforehand to pick up `.env`.
    ///
    /// `THREAD_ID` (default `"default"`), `DB_PATH` (unset: in-memory), `STEP_LIMIT`
    /// (positive integer, default 25), `VERBOSE` (`1` / `true`).
    pub fn from_env() -> Result<Self, Error> {
        let thread_id = std::env::var("THREAD_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_THREAD_ID.to_string());
        let store = match std::env::var("DB_PATH") {
            Ok(path) if !path.trim().is_empty() => StoreConfig::Sqlite { path },
            _ => StoreConfig::InMemory,
        };
        let step_limit = match std::env::var("STEP_LIMIT") {
            Ok(raw) => parse_step_limit(&raw)?,
            Err(_) => DEFAULT_STEP_LIMIT,
        };
        let verbose = std::env::var("VERBOSE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            thread_id,
            store,
            step_limit,
            verbose,
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// Only set fields in `options` override. `in_memory` wins over any database path.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(tid) = &options.thread_id {
            self.thread_id = tid.clone();
        }
        if let Some(path) = &options.db_path {
            self.store = StoreConfig::Sqlite { path: path.clone() };
        }
        if options.in_memory {
            self.store = StoreConfig::InMemory;
        }
        if let Some(limit) = options.step_limit {
            self.step_limit = limit;
        }
        if options.verbose {
            self.verbose = true;
        }
    }

    pub fn with_thread_id(mut self, thread_id: &str) -> Self {
        self.thread_id = thread_id.to_string();
        self
    }

    pub fn with_sqlite(mut self, path: &str) -> Self {
        self.store = StoreConfig::Sqlite {
            path: path.to_string(),
        };
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.store = StoreConfig::InMemory;
        self
    }

    pub fn db_path(&self) -> Option<&str> {
        self.store.db_path()
    }
}

fn parse_step_limit(raw: &str) -> Result<usize, Error> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("STEP_LIMIT must be a positive integer, got {:?}", raw),
        )
        .into()),
    }
}
