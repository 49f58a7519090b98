//! Writes download exports to a directory.

use clasher_core::error::{ClasherError, Result};
use clasher_core::export::VideoExport;
use clasher_core::media::VideoPayload;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Saves [`VideoExport`]s under a target directory.
///
/// Inline payloads are written as-is; remote payloads are fetched first.
pub struct VideoExporter {
    target_dir: PathBuf,
    client: Client,
}

impl VideoExporter {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            client: Client::new(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Writes the export and returns the created file path.
    pub async fn save(&self, export: &VideoExport) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.target_dir).await?;
        let path = self.target_dir.join(&export.file_name);

        let bytes = match &export.payload {
            VideoPayload::Inline { bytes, .. } => bytes.clone(),
            VideoPayload::Remote { url } => self.fetch(url).await?,
        };

        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Exported animation");
        Ok(path)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClasherError::io(format!("Failed to download {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(ClasherError::io(format!(
                "Failed to download {url}: status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClasherError::io(format!("Failed to read {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
