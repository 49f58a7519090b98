//! Secret management service trait.

use crate::config::SecretConfig;
use crate::error::Result;

/// Loads API credentials for the remote endpoints.
///
/// Implementations must never include secret values in error messages or logs.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Checks if the secret file exists.
    async fn secret_file_exists(&self) -> bool;
}
