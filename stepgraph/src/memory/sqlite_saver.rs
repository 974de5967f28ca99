//! SQLite-backed checkpointer (feature `sqlite`).
//!
//! One row per thread. The checkpoint body is encoded with a [`Serializer`]; status and step
//! are kept in their own columns so stored sessions can be inspected with plain SQL.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::checkpoint::Checkpoint;
use super::checkpointer::{CheckpointError, Checkpointer};
use super::serializer::{JsonSerializer, Serializer};

/// SQLite `Checkpointer`. Checkpoints survive process restarts.
///
/// Each save is a single `INSERT OR REPLACE`, so a reader sees either the previous row or the
/// new one. Blocking SQLite calls run on `tokio::task::spawn_blocking`.
pub struct SqliteSaver {
    conn: Arc<Mutex<Connection>>,
    serializer: Arc<dyn Serializer<Checkpoint>>,
}

impl SqliteSaver {
    /// Opens (or creates) the database at `path` with the JSON serializer.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::with_serializer(path, Arc::new(JsonSerializer))
    }

    pub fn with_serializer(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer<Checkpoint>>,
    ) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path.as_ref()).map_err(storage)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id TEXT PRIMARY KEY,
                checkpoint_id TEXT NOT NULL,
                status TEXT NOT NULL,
                step INTEGER NOT NULL,
                body BLOB NOT NULL
            )",
            [],
        )
        .map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            serializer,
        })
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, CheckpointError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, CheckpointError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| CheckpointError::Storage(format!("connection lock poisoned: {}", e)))?;
            f(&*guard)
        })
        .await
        .map_err(|e| CheckpointError::Storage(format!("task join error: {}", e)))?
    }
}

fn storage(e: rusqlite::Error) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn load(&self, thread_id: &str) -> Result<Checkpoint, CheckpointError> {
        let tid = thread_id.to_string();
        let body = self
            .blocking(move |conn| {
                conn.query_row(
                    "SELECT body FROM checkpoints WHERE thread_id = ?1",
                    params![tid],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
                .map_err(storage)
            })
            .await?;
        match body {
            Some(bytes) => self.serializer.deserialize(&bytes),
            None => Err(CheckpointError::NotFound(thread_id.to_string())),
        }
    }

    async fn save(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let body = self.serializer.serialize(checkpoint)?;
        let tid = thread_id.to_string();
        let checkpoint_id = checkpoint.id.clone();
        let status = checkpoint.status.as_str();
        let step = checkpoint.metadata.step as i64;
        self.blocking(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO checkpoints (thread_id, checkpoint_id, status, step, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![tid, checkpoint_id, status, step, body],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }

    async fn purge(&self, thread_id: &str) -> Result<bool, CheckpointError> {
        let tid = thread_id.to_string();
        self.blocking(move |conn| {
            let removed = conn
                .execute("DELETE FROM checkpoints WHERE thread_id = ?1", params![tid])
                .map_err(storage)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list_threads(&self) -> Result<Vec<String>, CheckpointError> {
        self.blocking(|conn| {
            let mut stmt = conn
                .prepare("SELECT thread_id FROM checkpoints ORDER BY thread_id")
                .map_err(storage)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(storage)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(storage)
        })
        .await
    }
}
