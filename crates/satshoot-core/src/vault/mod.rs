//! Ciphertext storage backends and the seed vault

mod file;
mod memory;
mod seed;
mod traits;

pub use file::FileVault;
pub use memory::MemoryVault;
pub use seed::SeedVault;
pub use traits::SecretStore;
