//! Secret service implementation.
//!
//! Reads API credentials from `secret.json`:
//!
//! ```json
//! { "gemini": { "api_key": "..." }, "vertex": { "access_token": "..." } }
//! ```

use crate::paths::{ClasherPaths, ServiceType};
use clasher_core::config::SecretConfig;
use clasher_core::error::{ClasherError, Result};
use clasher_core::secret::SecretService;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Service for loading secret configuration, cached after the first read.
pub struct SecretServiceImpl {
    path: PathBuf,
    secrets: RwLock<Option<SecretConfig>>,
}

impl SecretServiceImpl {
    /// Uses `secret.json` in the platform config directory (or `base_path`).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = ClasherPaths::new(base_path)
            .get_path(ServiceType::Secret)
            .map_err(|e| ClasherError::config(format!("Failed to get secret path: {e}")))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            secrets: RwLock::new(None),
        }
    }

    async fn load_from_disk(&self) -> Result<SecretConfig> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ClasherError::config(format!(
                "Failed to read secret file at {}: {}",
                self.path.display(),
                e.kind()
            ))
        })?;

        // serde_json messages can quote input, so only the position is reported.
        serde_json::from_str(&content).map_err(|e| {
            ClasherError::config(format!(
                "Failed to parse secret file at {} (line {}, column {})",
                self.path.display(),
                e.line(),
                e.column()
            ))
        })
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.load_from_disk().await?;
        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}
