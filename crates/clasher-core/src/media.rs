//! Image and video payloads exchanged between the session and the remote endpoints.

use crate::error::{ClasherError, Result};
use serde::{Deserialize, Serialize};

/// MIME type reported for decoded animation payloads.
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// A raw image file as handed over by a file picker or a drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, used to guess the type when none is declared.
    pub file_name: String,
    /// MIME type declared by the source, if any.
    pub declared_mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            declared_mime: None,
            bytes,
        }
    }

    pub fn with_declared_mime(mut self, mime: impl Into<String>) -> Self {
        self.declared_mime = Some(mime.into());
        self
    }

    /// Declared type, else the type guessed from the file extension.
    pub fn effective_mime(&self) -> Option<String> {
        self.declared_mime
            .clone()
            .filter(|mime| !mime.trim().is_empty())
            .or_else(|| {
                mime_guess::from_path(&self.file_name)
                    .first()
                    .map(|mime| mime.to_string())
            })
    }

    /// Validates the upload and turns it into the session's image payload.
    pub fn into_payload(self) -> Result<ImagePayload> {
        let mime = self.effective_mime().ok_or_else(|| {
            ClasherError::upload(format!(
                "Cannot determine the type of '{}'. Please upload a valid image file.",
                self.file_name
            ))
        })?;
        ImagePayload::new(mime, self.bytes)
    }
}

/// The uploaded source image held by the session.
///
/// Bytes stay raw; base64 encoding happens only when a request body is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    /// Builds a payload, rejecting anything that is not `image/*` or is empty.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !is_image_mime(&mime_type) {
            return Err(ClasherError::upload(format!(
                "Unsupported file type '{mime_type}'. Please upload a valid image file."
            )));
        }
        if bytes.is_empty() {
            return Err(ClasherError::upload(
                "The image file is empty. Please upload a valid image file.",
            ));
        }
        Ok(Self { mime_type, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A generated animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoPayload {
    /// Video bytes decoded from the endpoint response.
    Inline {
        mime_type: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// Video hosted elsewhere, e.g. the canned demo placeholder.
    Remote { url: String },
}

impl VideoPayload {
    pub fn inline(bytes: Vec<u8>) -> Self {
        Self::Inline {
            mime_type: VIDEO_MIME_TYPE.to_string(),
            bytes,
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote { url: url.into() }
    }
}

/// Returns true for `image/*` MIME types (case-insensitive, parameters ignored).
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}
