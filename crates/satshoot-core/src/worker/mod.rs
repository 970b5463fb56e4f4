//! Background worker for passphrase-based crypto
//!
//! Key derivation is deliberately expensive, so encrypt/decrypt calls must
//! not run on a latency-sensitive thread. The worker owns a request queue
//! and runs each derive+cipher operation on the blocking thread pool,
//! answering through a one-shot channel.
//!
//! There is no cancellation: a started operation runs to completion.
//! Requests on one worker are processed sequentially; spawn independent
//! workers to process multiple secrets concurrently - operations are pure
//! given their inputs, so no coordination is needed.

mod messages;

pub use messages::{CryptoRequest, CryptoResponse};

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::crypto::{decrypt_secret_with, encrypt_secret_with, KdfParams};
use crate::error::{CoreError, Result};

/// Queue depth before senders are backpressured
const REQUEST_QUEUE_DEPTH: usize = 16;

struct Job {
    request: CryptoRequest,
    reply: oneshot::Sender<Result<CryptoResponse>>,
}

/// Handle to a background crypto worker
///
/// Cloning the handle shares the same worker (and its request queue).
/// The worker shuts down when the last handle is dropped.
#[derive(Clone)]
pub struct CryptoWorker {
    tx: mpsc::Sender<Job>,
}

impl CryptoWorker {
    /// Spawn a worker using the default interactive-cost derivation
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        Self::spawn_with_params(None)
    }

    /// Spawn a worker with explicit derivation parameters
    pub fn spawn_with_params(params: Option<KdfParams>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(REQUEST_QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = tokio::task::spawn_blocking(move || handle(job.request, params))
                    .await
                    .map_err(|e| CoreError::Worker(e.to_string()))
                    .and_then(|result| result);

                // The caller may have dropped the reply end; nothing to do then
                let _ = job.reply.send(result);
            }

            debug!("Crypto worker stopped");
        });

        Self { tx }
    }

    /// Encrypt a secret off-thread; returns the hex ciphertext
    pub async fn encrypt_secret(
        &self,
        secret: &str,
        passphrase: &str,
        salt: &str,
    ) -> Result<String> {
        let response = self
            .request(CryptoRequest::Encrypt {
                secret: secret.to_string(),
                passphrase: passphrase.to_string(),
                salt: salt.to_string(),
            })
            .await?;

        match response {
            CryptoResponse::Encrypted { encrypted_secret } => Ok(encrypted_secret),
            CryptoResponse::Decrypted { .. } => Err(CoreError::Worker(
                "decrypt response to an encrypt request".to_string(),
            )),
        }
    }

    /// Decrypt a hex ciphertext off-thread; returns the plaintext secret
    pub async fn decrypt_secret(
        &self,
        encrypted_secret: &str,
        passphrase: &str,
        salt: &str,
    ) -> Result<String> {
        let response = self
            .request(CryptoRequest::Decrypt {
                encrypted_secret: encrypted_secret.to_string(),
                passphrase: passphrase.to_string(),
                salt: salt.to_string(),
            })
            .await?;

        match response {
            CryptoResponse::Decrypted { decrypted_secret } => Ok(decrypted_secret),
            CryptoResponse::Encrypted { .. } => Err(CoreError::Worker(
                "encrypt response to a decrypt request".to_string(),
            )),
        }
    }

    /// Send a request and await its one-shot response
    pub async fn request(&self, request: CryptoRequest) -> Result<CryptoResponse> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(Job {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| CoreError::WorkerClosed)?;

        reply_rx.await.map_err(|_| CoreError::WorkerClosed)?
    }
}

/// Dispatch one request; this is the whole worker body
fn handle(request: CryptoRequest, params: Option<KdfParams>) -> Result<CryptoResponse> {
    match request {
        CryptoRequest::Encrypt {
            secret,
            passphrase,
            salt,
        } => Ok(CryptoResponse::Encrypted {
            encrypted_secret: encrypt_secret_with(&secret, &passphrase, &salt, params)?,
        }),
        CryptoRequest::Decrypt {
            encrypted_secret,
            passphrase,
            salt,
        } => Ok(CryptoResponse::Decrypted {
            decrypted_secret: decrypt_secret_with(&encrypted_secret, &passphrase, &salt, params)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> Option<KdfParams> {
        Some(KdfParams {
            log_n: 10,
            r: 8,
            p: 1,
        })
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_through_worker() {
        let worker = CryptoWorker::spawn_with_params(fast_params());

        let encrypted = worker
            .encrypt_secret("nsec1seedmaterial", "correct horse", "user123")
            .await
            .unwrap();

        let decrypted = worker
            .decrypt_secret(&encrypted, "correct horse", "user123")
            .await
            .unwrap();

        assert_eq!(decrypted, "nsec1seedmaterial");
    }

    #[tokio::test]
    async fn test_wrong_passphrase_surfaces_decryption_error() {
        let worker = CryptoWorker::spawn_with_params(fast_params());

        let encrypted = worker
            .encrypt_secret("seed", "correct horse", "user123")
            .await
            .unwrap();

        let result = worker.decrypt_secret(&encrypted, "wrong", "user123").await;
        assert!(matches!(result, Err(CoreError::Decryption)));
    }

    #[tokio::test]
    async fn test_invalid_hex_surfaces_encoding_error() {
        let worker = CryptoWorker::spawn_with_params(fast_params());

        let result = worker
            .decrypt_secret("zz not hex", "passphrase", "user123")
            .await;
        assert!(matches!(result, Err(CoreError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_sequential_requests_on_one_worker() {
        let worker = CryptoWorker::spawn_with_params(fast_params());

        for secret in ["first", "second", "third"] {
            let encrypted = worker
                .encrypt_secret(secret, "passphrase", "user123")
                .await
                .unwrap();
            let decrypted = worker
                .decrypt_secret(&encrypted, "passphrase", "user123")
                .await
                .unwrap();
            assert_eq!(decrypted, secret);
        }
    }

    #[tokio::test]
    async fn test_independent_workers_run_concurrently() {
        let worker1 = CryptoWorker::spawn_with_params(fast_params());
        let worker2 = CryptoWorker::spawn_with_params(fast_params());

        let (a, b) = tokio::join!(
            worker1.encrypt_secret("secret a", "passphrase", "user1"),
            worker2.encrypt_secret("secret b", "passphrase", "user2"),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_by_request_value() {
        let worker = CryptoWorker::spawn_with_params(fast_params());

        let response = worker
            .request(CryptoRequest::Encrypt {
                secret: "seed".to_string(),
                passphrase: "passphrase".to_string(),
                salt: "user123".to_string(),
            })
            .await
            .unwrap();

        let encrypted = match response {
            CryptoResponse::Encrypted { encrypted_secret } => encrypted_secret,
            other => panic!("unexpected response: {:?}", other),
        };

        let response = worker
            .request(CryptoRequest::Decrypt {
                encrypted_secret: encrypted,
                passphrase: "passphrase".to_string(),
                salt: "user123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            response,
            CryptoResponse::Decrypted {
                decrypted_secret: "seed".to_string()
            }
        );
    }
}
