//! Serializer for checkpoint storage (value <-> bytes).
//!
//! Used by persistent Checkpointer implementations.

use crate::memory::checkpointer::CheckpointError;

/// Serializes and deserializes values for checkpoint storage.
///
/// Used by `SqliteSaver`. `MemorySaver` stores `Checkpoint` values directly and does not
/// use a Serializer.
pub trait Serializer<S>: Send + Sync {
    fn serialize(&self, value: &S) -> Result<Vec<u8>, CheckpointError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<S, CheckpointError>;
}

/// JSON-based serializer. Requires S: Serialize + serde::de::DeserializeOwned.
pub struct JsonSerializer;

impl<S> Serializer<S> for JsonSerializer
where
    S: serde::Serialize + serde::de::DeserializeOwned,
{
    fn serialize(&self, value: &S) -> Result<Vec<u8>, CheckpointError> {
        serde_json::to_vec(value).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<S, CheckpointError> {
        serde_json::from_slice(bytes).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}
