//! Error types for event projection

use thiserror::Error;

/// Result type alias for event operations
pub type EventResult<T> = std::result::Result<T, EventError>;

/// Event projection error types
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Wrong event kind: expected {expected}, got {got}")]
    WrongKind { expected: u32, got: u32 },

    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    #[error("Invalid value for tag {tag}: {value}")]
    InvalidTag { tag: String, value: String },

    #[error("Invalid event address: {0}")]
    InvalidAddress(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
