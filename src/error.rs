//! Error types shared by the observer, watcher and replay layers

use thiserror::Error;

/// Errors that can occur while setting up observation or loading traces
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pointer stream already taken")]
    StreamAlreadyTaken,

    #[error("Trace error: {0}")]
    Trace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for observer operations
pub type Result<T> = std::result::Result<T, ObserverError>;
