//! Passphrase-based key derivation using scrypt

use scrypt::{scrypt, Params};

use super::SecretKey;
use crate::error::{CoreError, Result};

/// Derived key length: 32 bytes = 256 bits
const KEY_LEN: usize = 32;

/// Parameters for scrypt key derivation
///
/// The defaults are deliberately expensive for interactive use; the cost is
/// paid on every encrypt/decrypt call so that no derived key outlives a
/// single operation. Callers on a latency-sensitive thread should go
/// through [`crate::worker::CryptoWorker`] instead of calling directly.
#[derive(Debug, Clone, Copy)]
pub struct KdfParams {
    /// Work factor exponent (memory/CPU cost is 2^log_n)
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 16, // 64 MB
            r: 8,
            p: 1,
        }
    }
}

/// Derive a 256-bit key from a passphrase using scrypt
///
/// Deterministic: the same (passphrase, salt) pair always yields the same
/// key, so a user can re-derive it on a new device without any persisted
/// state beyond the salt. The salt is an application-chosen stable value
/// (typically the user's public key) and is not secret.
///
/// An empty passphrase is accepted; passphrase policy belongs to the caller.
pub fn derive_key(passphrase: &str, salt: &str, params: Option<KdfParams>) -> Result<SecretKey> {
    let params = params.unwrap_or_default();

    let scrypt_params = Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;

    let mut key_bytes = [0u8; KEY_LEN];
    scrypt(
        passphrase.as_bytes(),
        salt.as_bytes(),
        &scrypt_params,
        &mut key_bytes,
    )
    .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;

    Ok(SecretKey::new(key_bytes))
}
