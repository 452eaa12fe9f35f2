//! Error type for work management.

use fynkr_core::{ProjectId, ValidationError};
use fynkr_storage::StorageError;

/// Result alias for work operations.
pub type Result<T> = std::result::Result<T, WorkError>;

/// Errors surfaced to the UI layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    /// Input rejected; nothing changed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failed; in-memory state was left as before
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// No project with that id
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),

    /// A simulated remote step was cancelled before it finished
    #[error("operation cancelled")]
    Cancelled,

    /// Payment processor refused or failed
    #[error("payment gateway error: {0}")]
    Gateway(String),
}
