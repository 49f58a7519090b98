//! Path management for clasher configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/clasher/           # Config directory (platform specific)
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys and tokens
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "clasher";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Files managed by clasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
}

impl ServiceType {
    fn file_name(self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Secret => "secret.json",
        }
    }
}

/// Resolves clasher file locations, optionally under an explicit base directory.
#[derive(Debug, Clone)]
pub struct ClasherPaths {
    base: Option<PathBuf>,
}

impl ClasherPaths {
    /// `base_path` replaces the platform config directory when given (used by tests).
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the clasher configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}
