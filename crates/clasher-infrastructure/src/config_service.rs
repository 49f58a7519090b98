//! Configuration service implementation.
//!
//! Loads `ClasherConfig` from `config.toml` and caches it.

use crate::paths::{ClasherPaths, ServiceType};
use clasher_core::config::ClasherConfig;
use clasher_core::error::{ClasherError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults; a malformed file is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<ClasherConfig>>>,
}

impl ConfigService {
    /// Uses `config.toml` in the platform config directory (or `base_path`).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = ClasherPaths::new(base_path)
            .get_path(ServiceType::Config)
            .map_err(|e| ClasherError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Uses an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<ClasherConfig> {
        if let Some(cached) = self.read_cache()? {
            return Ok(cached);
        }

        let loaded = self.load_config().await?;
        let mut write_lock = self
            .config
            .write()
            .map_err(|_| ClasherError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) -> Result<()> {
        let mut write_lock = self
            .config
            .write()
            .map_err(|_| ClasherError::internal("config cache lock poisoned"))?;
        *write_lock = None;
        Ok(())
    }

    fn read_cache(&self) -> Result<Option<ClasherConfig>> {
        let read_lock = self
            .config
            .read()
            .map_err(|_| ClasherError::internal("config cache lock poisoned"))?;
        Ok(read_lock.clone())
    }

    async fn load_config(&self) -> Result<ClasherConfig> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::info!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ClasherConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(ClasherConfig::default());
        }

        let config = ClasherConfig::from_toml_str(&content).map_err(|e| {
            tracing::error!(path = %self.path.display(), "Failed to parse config: {}", e);
            e
        })?;
        tracing::debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }
}
