//! Storage trait abstraction.

use async_trait::async_trait;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key contains characters the backend cannot address
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Key → text blob store the dashboard persists through.
///
/// Backends store opaque strings; encoding records is the caller's job
/// (see [`crate::collections`]).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Load the blob stored under `key`, `None` when absent.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    async fn save(&mut self, key: &str, value: &str) -> Result<()>;
}
