//! Checkpointer trait and CheckpointError.
//!
//! Saves and loads the latest checkpoint of each thread, keyed by `thread_id`.

use async_trait::async_trait;

use crate::memory::checkpoint::Checkpoint;

/// Error type for checkpoint operations.
///
/// Used by Checkpointer::load, save, purge and by Serializer.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// No checkpoint exists for the thread; the caller treats it as a fresh session.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
}

impl CheckpointError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CheckpointError::NotFound(_))
    }
}

/// Persists the latest checkpoint of each thread.
///
/// `save` replaces the previous checkpoint atomically: a concurrent or later `load` sees
/// either the old or the new checkpoint, never a mix. Saving identical content twice is
/// indistinguishable from saving it once. Implementations: `MemorySaver` (in-memory) and
/// `SqliteSaver` (feature `sqlite`).
///
/// **Interaction**: Injected at compile via `StateGraph::compile_with_checkpointer`;
/// the run controller is its only writer.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Latest checkpoint for the thread, or `CheckpointError::NotFound`.
    async fn load(&self, thread_id: &str) -> Result<Checkpoint, CheckpointError>;

    /// Atomically replaces the checkpoint for the thread.
    async fn save(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Removes the thread's checkpoint. Returns whether one existed.
    async fn purge(&self, thread_id: &str) -> Result<bool, CheckpointError>;

    /// Thread ids with a stored checkpoint, sorted.
    async fn list_threads(&self) -> Result<Vec<String>, CheckpointError>;
}
