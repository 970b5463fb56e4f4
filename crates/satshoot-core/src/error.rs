//! Error types for satshoot-core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed - wrong passphrase or corrupted data")]
    Decryption,

    #[error("Invalid hex encoding: {0}")]
    Encoding(String),

    #[error("Decrypted data is not valid UTF-8")]
    Utf8,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No seed stored in the vault")]
    SeedNotFound,

    #[error("Crypto worker is no longer running")]
    WorkerClosed,

    #[error("Crypto worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
