//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for ciphertext storage backends
///
/// Values are opaque hex ciphertext strings produced by the secret codec;
/// backends never see plaintext or key material.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Store a value under the given name
    async fn put(&self, name: &str, value: &str) -> Result<()>;

    /// Retrieve a value by name
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Delete a value by name
    async fn delete(&self, name: &str) -> Result<()>;

    /// Check if a name exists
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Clear all stored values
    async fn clear(&self) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
