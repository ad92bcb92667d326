//! Error types for the dispatch core

use thiserror::Error;

/// Errors surfaced by the registry, store, and orchestrator
#[derive(Error, Debug)]
pub enum SincorError {
    /// Startup-only: registry source missing or malformed, bad env. Fatal.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("task {0} not found")]
    TaskNotFound(i64),

    /// A task was asked to transition out of a terminal state.
    #[error("invalid state for task {task_id}: {reason}")]
    InvalidState { task_id: i64, reason: String },

    /// The artifact could not be persisted. The task record is marked
    /// failed by the orchestrator before this propagates.
    #[error("artifact write failed for task {task_id}: {source}")]
    ArtifactWrite {
        task_id: i64,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, SincorError>;
