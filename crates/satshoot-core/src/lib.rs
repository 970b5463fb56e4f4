//! # satshoot-core
//!
//! Core client functionality for SatShoot including:
//! - XChaCha20-Poly1305 seed encryption under scrypt-derived keys
//! - Background crypto worker keeping derivation off the caller's thread
//! - Passphrase-protected seed vault with file and in-memory backends
//! - Application context with explicit subscription handles
//! - Notification routing for marketplace events

pub mod context;
pub mod crypto;
pub mod error;
pub mod notifications;
pub mod settings;
pub mod vault;
pub mod worker;

pub use context::{AppContext, Subscription};
pub use crypto::{
    decrypt_secret, derive_key, encrypt_secret, KdfParams, SecretKey, SecretString,
};
pub use error::{CoreError, Result};
pub use notifications::{Notification, NotificationRouter};
pub use settings::{NotificationPrefs, Settings, SettingsManager};
pub use vault::{FileVault, MemoryVault, SecretStore, SeedVault};
pub use worker::{CryptoRequest, CryptoResponse, CryptoWorker};
