//! XChaCha20-Poly1305 authenticated encryption
//!
//! Encryption output layout: `nonce ‖ ciphertext ‖ auth_tag`
//! - Nonce: 24 bytes (192 bits), freshly random per call
//! - Auth tag: 16 bytes (128 bits), appended by the AEAD
//!
//! The nonce is carried inside the output so decryption is self-contained
//! given only the key. No associated data is bound in: any holder of the
//! key can decrypt any ciphertext produced under it, regardless of origin.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::{rngs::OsRng, RngCore};

use super::SecretKey;
use crate::error::{CoreError, Result};

/// Nonce length: 24 bytes for the extended-nonce construction
pub const NONCE_LEN: usize = 24;

/// Authentication tag length: 16 bytes
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext under the given key
///
/// Generates a fresh random nonce per call and prepends it to the output,
/// so two encryptions of the same plaintext never produce the same bytes.
pub fn encrypt(plaintext: &[u8], key: &SecretKey) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Decrypt data produced by [`encrypt`]
///
/// Fails with [`CoreError::Decryption`] if the data was tampered with,
/// truncated, or encrypted under a different key. Never returns garbage
/// plaintext on authentication failure.
pub fn decrypt(data: &[u8], key: &SecretKey) -> Result<Vec<u8>> {
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::Decryption);
    }

    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);

    cipher
        .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CoreError::Decryption)
}
