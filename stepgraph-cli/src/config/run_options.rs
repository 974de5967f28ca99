//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options). Callers (the binary
//! or tests) build a `RunOptions` and apply it on top of env-based config.

/// Optional overrides: thread, database path, step limit, verbosity.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Session to run (overrides `THREAD_ID`).
    pub thread_id: Option<String>,
    /// SQLite database path (overrides `DB_PATH`).
    pub db_path: Option<String>,
    /// Force in-memory sessions even when `DB_PATH` is set.
    pub in_memory: bool,
    /// Steps per call before the run is stopped (overrides `STEP_LIMIT`).
    pub step_limit: Option<usize>,
    /// Show debug logs (step enter/exit, run control) on stderr.
    pub verbose: bool,
}
