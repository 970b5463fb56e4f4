//! File-backed ciphertext storage
//!
//! Stores entries in a versioned JSON file in the user's data directory.
//! Values arrive already encrypted; this layer only persists them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::SecretStore;
use crate::error::{CoreError, Result};

/// File-backed storage for hex ciphertext entries
pub struct FileVault {
    /// Directory for the vault file
    vault_dir: PathBuf,
    /// In-memory cache of the vault
    cache: Arc<RwLock<VaultCache>>,
}

/// In-memory representation of stored data
#[derive(Debug, Default, Serialize, Deserialize)]
struct VaultCache {
    /// Map of name -> hex ciphertext
    entries: HashMap<String, String>,
    /// Whether the cache has been modified since last save
    #[serde(skip)]
    dirty: bool,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct VaultFile {
    version: u32,
    updated_at: DateTime<Utc>,
    entries: HashMap<String, String>,
}

impl FileVault {
    /// Create a vault in the platform data directory
    pub fn new() -> Result<Self> {
        let vault_dir = Self::default_vault_dir()?;
        Self::with_dir(vault_dir)
    }

    /// Create a vault with a custom directory (for testing)
    pub fn with_dir(vault_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&vault_dir)?;

        debug!("File vault initialized at: {:?}", vault_dir);

        Ok(Self {
            vault_dir,
            cache: Arc::new(RwLock::new(VaultCache::default())),
        })
    }

    /// Get the default vault directory
    fn default_vault_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "satshoot", "satshoot")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| CoreError::Storage("Could not determine data directory".to_string()))
    }

    /// Get the path to the vault file
    fn vault_file_path(&self) -> PathBuf {
        self.vault_dir.join("vault.json")
    }

    /// Load the vault from disk
    pub async fn load(&self) -> Result<()> {
        let path = self.vault_file_path();

        if !path.exists() {
            debug!("No existing vault file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: VaultFile = serde_json::from_str(&contents)?;

        let mut cache = self.cache.write().await;
        cache.entries = file.entries;
        cache.dirty = false;

        debug!("Loaded {} entries from vault", cache.entries.len());
        Ok(())
    }

    /// Save the vault to disk
    pub async fn save(&self) -> Result<()> {
        let cache = self.cache.read().await;

        if !cache.dirty {
            return Ok(());
        }

        let file = VaultFile {
            version: 1,
            updated_at: Utc::now(),
            entries: cache.entries.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.vault_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} entries to vault", cache.entries.len());
        Ok(())
    }

    /// Get the vault directory path
    pub fn vault_dir(&self) -> &PathBuf {
        &self.vault_dir
    }
}

#[async_trait]
impl SecretStore for FileVault {
    async fn put(&self, name: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.write().await;
        cache.entries.insert(name.to_string(), value.to_string());
        cache.dirty = true;
        drop(cache);

        self.save().await?;

        debug!("Stored entry: {}", name);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>> {
        let cache = self.cache.read().await;
        Ok(cache.entries.get(name).cloned())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut cache = self.cache.write().await;

        if cache.entries.remove(name).is_some() {
            cache.dirty = true;
            drop(cache);
            self.save().await?;
            debug!("Deleted entry: {}", name);
        }

        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let cache = self.cache.read().await;
        Ok(cache.entries.contains_key(name))
    }

    async fn clear(&self) -> Result<()> {
        let mut cache = self.cache.write().await;
        cache.entries.clear();
        cache.dirty = true;
        drop(cache);

        self.save().await?;
        debug!("Cleared all vault entries");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "File Vault"
    }
}
