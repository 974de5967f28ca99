//! Where sessions are checkpointed.
//!
//! Used by [`RunConfig`](super::RunConfig) and by `build_checkpointer` in run.

/// Checkpoint store selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StoreConfig {
    /// Sessions live in process memory and are lost on exit.
    #[default]
    InMemory,
    /// Sessions are persisted to a SQLite file and survive restarts.
    Sqlite { path: String },
}

impl StoreConfig {
    pub fn db_path(&self) -> Option<&str> {
        match self {
            StoreConfig::Sqlite { path } => Some(path),
            StoreConfig::InMemory => None,
        }
    }
}
