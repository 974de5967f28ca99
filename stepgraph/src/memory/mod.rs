//! # Memory: checkpoint persistence
//!
//! A session's durable state is its latest [`Checkpoint`], keyed by `thread_id`. The run
//! controller loads it at the start of every call and replaces it at every step boundary.
//!
//! ## Checkpointer Implementations
//!
//! | Type             | Persistence | Use case                | Feature  |
//! |------------------|-------------|-------------------------|----------|
//! | [`MemorySaver`]  | In-memory   | Dev, tests              | —        |
//! | `SqliteSaver`    | SQLite file | Single node, restarts   | `sqlite` |
//!
//! Use with [`StateGraph::compile_with_checkpointer`](crate::graph::StateGraph::compile_with_checkpointer).
//! `SqliteSaver` encodes checkpoints with a [`Serializer`] ([`JsonSerializer`] by default).

mod checkpoint;
mod checkpointer;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource, SessionStatus};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
