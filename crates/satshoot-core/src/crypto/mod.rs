//! Cryptographic primitives for seed protection
//!
//! This module provides:
//! - XChaCha20-Poly1305 authenticated encryption
//! - scrypt key derivation from passphrases
//! - Secure memory handling with zeroize
//! - The hex secret codec used for at-rest storage

mod cipher;
mod codec;
mod key_derivation;
mod secure_memory;

pub use cipher::{decrypt, encrypt, NONCE_LEN, TAG_LEN};
pub use codec::{decrypt_secret, decrypt_secret_with, encrypt_secret, encrypt_secret_with};
pub use key_derivation::{derive_key, KdfParams};
pub use secure_memory::{SecretKey, SecretString};
