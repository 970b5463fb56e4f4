//! Crypto worker message types
//!
//! Requests are a tagged variant rather than a bag of optional fields, so
//! a message carrying both a secret and a ciphertext is unrepresentable
//! and dispatch is an explicit match.

use serde::{Deserialize, Serialize};

/// A request to the crypto worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CryptoRequest {
    /// Encrypt a plaintext secret under a passphrase
    Encrypt {
        secret: String,
        passphrase: String,
        salt: String,
    },
    /// Recover a secret from a hex ciphertext
    #[serde(rename_all = "camelCase")]
    Decrypt {
        encrypted_secret: String,
        passphrase: String,
        salt: String,
    },
}

/// A response from the crypto worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CryptoResponse {
    /// Result of an encrypt request
    #[serde(rename_all = "camelCase")]
    Encrypted { encrypted_secret: String },
    /// Result of a decrypt request
    #[serde(rename_all = "camelCase")]
    Decrypted { decrypted_secret: String },
}
