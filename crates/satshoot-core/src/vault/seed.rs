//! Seed vault: passphrase-protected persistence of the user's private seed
//!
//! The seed is encrypted with the user's public key as the derivation salt,
//! so the only secret a user needs to recover it on a new device is the
//! passphrase. The public key is stored next to the ciphertext; it is not
//! secret, it only diversifies derivation across users.

use std::sync::Arc;
use tracing::{debug, info};

use super::SecretStore;
use crate::crypto::SecretString;
use crate::error::{CoreError, Result};
use crate::worker::CryptoWorker;

/// Storage entry for the encrypted seed
const SEED_ENTRY: &str = "seed";

/// Storage entry for the derivation salt (the user's public key)
const SEED_SALT_ENTRY: &str = "seed.salt";

/// Passphrase-protected seed storage over a [`SecretStore`] backend
pub struct SeedVault {
    /// Storage backend
    store: Arc<dyn SecretStore>,
    /// Worker that keeps derivation off the caller's thread
    worker: CryptoWorker,
}

impl SeedVault {
    /// Create a seed vault with a fresh worker at interactive cost
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            worker: CryptoWorker::spawn(),
        }
    }

    /// Create a seed vault sharing an existing worker
    pub fn with_worker(store: Arc<dyn SecretStore>, worker: CryptoWorker) -> Self {
        Self { store, worker }
    }

    /// Whether a seed is stored
    pub async fn is_initialized(&self) -> Result<bool> {
        self.store.exists(SEED_ENTRY).await
    }

    /// Encrypt and persist a seed
    ///
    /// Replaces any previously stored seed; re-encryption is always whole,
    /// never incremental.
    pub async fn store_seed(&self, seed: &str, passphrase: &str, pubkey: &str) -> Result<()> {
        let encrypted = self.worker.encrypt_secret(seed, passphrase, pubkey).await?;

        self.store.put(SEED_ENTRY, &encrypted).await?;
        self.store.put(SEED_SALT_ENTRY, pubkey).await?;

        info!("Stored encrypted seed for {}", pubkey);
        Ok(())
    }

    /// Decrypt the stored seed with the given passphrase
    ///
    /// A wrong passphrase fails with [`CoreError::Decryption`], distinctly
    /// from storage or encoding failures, so callers can say "incorrect
    /// passphrase" rather than showing a technical error.
    pub async fn unlock_seed(&self, passphrase: &str) -> Result<SecretString> {
        let encrypted = self
            .store
            .get(SEED_ENTRY)
            .await?
            .ok_or(CoreError::SeedNotFound)?;
        let salt = self
            .store
            .get(SEED_SALT_ENTRY)
            .await?
            .ok_or(CoreError::SeedNotFound)?;

        let seed = self
            .worker
            .decrypt_secret(&encrypted, passphrase, &salt)
            .await?;

        debug!("Seed unlocked");
        Ok(SecretString::new(seed))
    }

    /// Change the passphrase protecting the stored seed
    pub async fn change_passphrase(&self, old_passphrase: &str, new_passphrase: &str) -> Result<()> {
        let seed = self.unlock_seed(old_passphrase).await?;
        let salt = self
            .store
            .get(SEED_SALT_ENTRY)
            .await?
            .ok_or(CoreError::SeedNotFound)?;

        self.store_seed(seed.expose(), new_passphrase, &salt).await?;

        info!("Seed passphrase changed");
        Ok(())
    }

    /// Delete the stored seed and its salt
    pub async fn clear_seed(&self) -> Result<()> {
        self.store.delete(SEED_ENTRY).await?;
        self.store.delete(SEED_SALT_ENTRY).await?;

        info!("Seed cleared from {}", self.store.backend_name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::vault::{FileVault, MemoryVault};
    use tempfile::TempDir;

    fn fast_worker() -> CryptoWorker {
        CryptoWorker::spawn_with_params(Some(KdfParams {
            log_n: 10,
            r: 8,
            p: 1,
        }))
    }

    fn test_vault() -> SeedVault {
        SeedVault::with_worker(Arc::new(MemoryVault::new()), fast_worker())
    }

    #[tokio::test]
    async fn test_store_and_unlock() {
        let vault = test_vault();

        assert!(!vault.is_initialized().await.unwrap());

        vault
            .store_seed("nsec1seedmaterial", "correct horse", "npub1user")
            .await
            .unwrap();
        assert!(vault.is_initialized().await.unwrap());

        let seed = vault.unlock_seed("correct horse").await.unwrap();
        assert_eq!(seed.expose(), "nsec1seedmaterial");
    }

    #[tokio::test]
    async fn test_wrong_passphrase_is_decryption_error() {
        let vault = test_vault();

        vault
            .store_seed("nsec1seedmaterial", "correct horse", "npub1user")
            .await
            .unwrap();

        let result = vault.unlock_seed("wrong horse").await;
        assert!(matches!(result, Err(CoreError::Decryption)));
    }

    #[tokio::test]
    async fn test_unlock_without_seed() {
        let vault = test_vault();

        let result = vault.unlock_seed("any").await;
        assert!(matches!(result, Err(CoreError::SeedNotFound)));
    }

    #[tokio::test]
    async fn test_change_passphrase() {
        let vault = test_vault();

        vault
            .store_seed("nsec1seedmaterial", "old passphrase", "npub1user")
            .await
            .unwrap();

        vault
            .change_passphrase("old passphrase", "new passphrase")
            .await
            .unwrap();

        let result = vault.unlock_seed("old passphrase").await;
        assert!(matches!(result, Err(CoreError::Decryption)));

        let seed = vault.unlock_seed("new passphrase").await.unwrap();
        assert_eq!(seed.expose(), "nsec1seedmaterial");
    }

    #[tokio::test]
    async fn test_clear_seed() {
        let vault = test_vault();

        vault
            .store_seed("nsec1seedmaterial", "passphrase", "npub1user")
            .await
            .unwrap();
        vault.clear_seed().await.unwrap();

        assert!(!vault.is_initialized().await.unwrap());
        let result = vault.unlock_seed("passphrase").await;
        assert!(matches!(result, Err(CoreError::SeedNotFound)));
    }

    #[tokio::test]
    async fn test_survives_restart_on_file_backend() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = Arc::new(FileVault::with_dir(temp_dir.path().to_path_buf()).unwrap());
            let vault = SeedVault::with_worker(store, fast_worker());
            vault
                .store_seed("nsec1seedmaterial", "correct horse", "npub1user")
                .await
                .unwrap();
        }

        {
            let store = FileVault::with_dir(temp_dir.path().to_path_buf()).unwrap();
            store.load().await.unwrap();

            let vault = SeedVault::with_worker(Arc::new(store), fast_worker());
            let seed = vault.unlock_seed("correct horse").await.unwrap();
            assert_eq!(seed.expose(), "nsec1seedmaterial");
        }
    }
}
