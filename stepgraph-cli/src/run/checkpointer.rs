//! Checkpointer selection from [`StoreConfig`](crate::config::StoreConfig).

use std::sync::Arc;

use stepgraph::{Checkpointer, MemorySaver};

use crate::config::StoreConfig;

use super::Error;

/// In-memory store, or a SQLite file when a path is configured.
///
/// Without the `sqlite` feature a configured path is an error rather than a silent fallback.
pub fn build_checkpointer(store: &StoreConfig) -> Result<Arc<dyn Checkpointer>, Error> {
    match store {
        StoreConfig::InMemory => Ok(Arc::new(MemorySaver::new())),
        StoreConfig::Sqlite { path } => sqlite(path),
    }
}

#[cfg(feature = "sqlite")]
fn sqlite(path: &str) -> Result<Arc<dyn Checkpointer>, Error> {
    tracing::debug!(path = %path, "opening sqlite checkpointer");
    Ok(Arc::new(stepgraph::SqliteSaver::new(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn sqlite(path: &str) -> Result<Arc<dyn Checkpointer>, Error> {
    Err(format!(
        "DB_PATH={} needs the sqlite feature. Build with --features sqlite",
        path
    )
    .into())
}
