//! In-memory ciphertext storage for tests and ephemeral sessions

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SecretStore;
use crate::error::Result;

/// In-memory storage; contents are lost when dropped
#[derive(Default)]
pub struct MemoryVault {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryVault {
    /// Create an empty in-memory vault
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemoryVault {
    async fn put(&self, name: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(name).cloned())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(name);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(name))
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Memory Vault"
    }
}
