mod file_store;
mod memory_store;

use thiserror::Error;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store that outlives a single run, in the manner of a
/// browser's local storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
