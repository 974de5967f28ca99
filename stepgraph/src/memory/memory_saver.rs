//! In-memory checkpointer for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::checkpoint::Checkpoint;
use super::checkpointer::{CheckpointError, Checkpointer};

/// In-memory `Checkpointer`. Data is lost when the process exits.
///
/// A save holds the write lock for the whole replacement, so saves to one thread never
/// interleave and loads never observe a partial write.
#[derive(Default)]
pub struct MemorySaver {
    inner: RwLock<HashMap<String, Checkpoint>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn load(&self, thread_id: &str) -> Result<Checkpoint, CheckpointError> {
        self.inner
            .read()
            .await
            .get(thread_id)
            .cloned()
            .ok_or_else(|| CheckpointError::NotFound(thread_id.to_string()))
    }

    async fn save(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.inner
            .write()
            .await
            .insert(thread_id.to_string(), checkpoint.clone());
        Ok(())
    }

    async fn purge(&self, thread_id: &str) -> Result<bool, CheckpointError> {
        Ok(self.inner.write().await.remove(thread_id).is_some())
    }

    async fn list_threads(&self) -> Result<Vec<String>, CheckpointError> {
        let mut ids: Vec<String> = self.inner.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
