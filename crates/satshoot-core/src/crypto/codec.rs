//! Secret codec: passphrase-encrypted secrets as hex strings
//!
//! The ciphertext string is the only form ever persisted. The derived key
//! is recomputed on every call and dropped immediately after, so stealing
//! a stored ciphertext is worthless without the passphrase.

use super::cipher::{decrypt, encrypt};
use super::key_derivation::{derive_key, KdfParams};
use crate::error::{CoreError, Result};

/// Encrypt a secret under a passphrase, returning a lowercase hex string
///
/// The salt must be a stable per-user value (typically the user's public
/// key) so the key can be re-derived on another device. Derivation uses
/// the default interactive-cost parameters; see [`KdfParams`].
pub fn encrypt_secret(secret: &str, passphrase: &str, salt: &str) -> Result<String> {
    encrypt_secret_with(secret, passphrase, salt, None)
}

/// [`encrypt_secret`] with explicit derivation parameters
pub fn encrypt_secret_with(
    secret: &str,
    passphrase: &str,
    salt: &str,
    params: Option<KdfParams>,
) -> Result<String> {
    let key = derive_key(passphrase, salt, params)?;
    let data = encrypt(secret.as_bytes(), &key)?;
    Ok(hex::encode(data))
}

/// Recover a secret from a hex ciphertext produced by [`encrypt_secret`]
///
/// A wrong passphrase or salt fails with [`CoreError::Decryption`]; invalid
/// hex fails with [`CoreError::Encoding`]. Neither ever yields corrupted
/// plaintext silently.
pub fn decrypt_secret(hex_ciphertext: &str, passphrase: &str, salt: &str) -> Result<String> {
    decrypt_secret_with(hex_ciphertext, passphrase, salt, None)
}

/// [`decrypt_secret`] with explicit derivation parameters
pub fn decrypt_secret_with(
    hex_ciphertext: &str,
    passphrase: &str,
    salt: &str,
    params: Option<KdfParams>,
) -> Result<String> {
    let data = hex::decode(hex_ciphertext).map_err(|e| CoreError::Encoding(e.to_string()))?;

    let key = derive_key(passphrase, salt, params)?;
    let plaintext = decrypt(&data, &key)?;

    String::from_utf8(plaintext).map_err(|_| CoreError::Utf8)
}
