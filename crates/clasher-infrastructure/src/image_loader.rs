//! Builds `ImageUpload`s from files on disk.
//!
//! This is the file-picker side of image input; type validation happens when
//! the orchestrator accepts the upload.

use clasher_core::error::{ClasherError, Result};
use clasher_core::media::ImageUpload;
use std::path::Path;

pub struct ImageFileLoader;

impl ImageFileLoader {
    /// Reads `path` and declares the MIME type guessed from its extension.
    pub async fn load(path: impl AsRef<Path>) -> Result<ImageUpload> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ClasherError::upload(format!("'{}' is not a file", path.display())))?;

        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(file = %file_name, size = bytes.len(), "Loaded image file");

        let mut upload = ImageUpload::new(file_name, bytes);
        if let Some(mime) = mime_guess::from_path(path).first() {
            upload = upload.with_declared_mime(mime.to_string());
        }
        Ok(upload)
    }
}
