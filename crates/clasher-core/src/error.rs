//! Error types for the Clasher workspace.

use crate::session::OperationStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing text shown when the assistant endpoint could not be reached
/// or answered with a non-success status.
pub const ASSISTANT_FAILED_MESSAGE: &str = "The AI helper failed to respond. Please try again.";

/// User-facing text shown when the assistant answered without a usable completion.
pub const ASSISTANT_FORMAT_MESSAGE: &str =
    "The AI helper returned an unexpected response format.";

/// Reason an intent was refused before any network call was made.
///
/// A presentation layer normally renders these as disabled actions
/// (see [`crate::session::Affordances`]); the orchestrator still checks them
/// so a bypassed button cannot start a conflicting request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardViolation {
    /// Another operation is in flight.
    #[error("Another operation is already running ({active})")]
    Busy { active: OperationStatus },

    #[error("Please upload an image first.")]
    MissingImage,

    #[error("Please write a prompt first.")]
    EmptyPrompt,

    /// Story continuation needs a prompt that already produced an animation.
    #[error("Generate an animation first to continue its story.")]
    NoPriorPrompt,

    #[error("There is no generated animation to download.")]
    NoResult,
}

/// A shared error type for the entire Clasher workspace.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ClasherError {
    /// Rejected image input (wrong type or empty payload)
    #[error("Upload error: {0}")]
    Upload(String),

    /// Assistant endpoint failed (transport or non-success status)
    #[error("Assistant error: {detail}")]
    Assistant {
        status_code: Option<u16>,
        detail: String,
    },

    /// Assistant answered but no completion could be extracted
    #[error("Assistant format error: {0}")]
    AssistantFormat(String),

    /// Animation endpoint failed or returned no usable video
    #[error("Animation error: {0}")]
    Animation(String),

    /// Intent refused by the orchestrator guard
    #[error("Guard violation: {0}")]
    Guard(#[from] GuardViolation),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClasherError {
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }

    pub fn assistant(status_code: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Assistant {
            status_code,
            detail: detail.into(),
        }
    }

    pub fn assistant_format(detail: impl Into<String>) -> Self {
        Self::AssistantFormat(detail.into())
    }

    pub fn animation(message: impl Into<String>) -> Self {
        Self::Animation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The message written into the session's `error_message`.
    ///
    /// Both assistant variants collapse into fixed texts; the upstream detail is
    /// only logged. Animation and upload messages are shown as produced.
    pub fn user_message(&self) -> String {
        match self {
            Self::Assistant { .. } => ASSISTANT_FAILED_MESSAGE.to_string(),
            Self::AssistantFormat(_) => ASSISTANT_FORMAT_MESSAGE.to_string(),
            Self::Animation(message) | Self::Upload(message) => message.clone(),
            Self::Guard(violation) => violation.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ClasherError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ClasherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ClasherError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ClasherError>`.
pub type Result<T> = std::result::Result<T, ClasherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_errors_collapse_to_fixed_messages() {
        let http = ClasherError::assistant(Some(503), "UNAVAILABLE: overloaded");
        let format = ClasherError::assistant_format("no candidates");

        assert_eq!(http.user_message(), ASSISTANT_FAILED_MESSAGE);
        assert_eq!(format.user_message(), ASSISTANT_FORMAT_MESSAGE);
    }

    #[test]
    fn test_animation_message_is_shown_verbatim() {
        let err = ClasherError::animation("Quota exceeded");
        assert_eq!(err.user_message(), "Quota exceeded");
    }

    #[test]
    fn test_guard_violation_messages() {
        assert_eq!(
            ClasherError::from(GuardViolation::NoPriorPrompt).user_message(),
            "Generate an animation first to continue its story."
        );
        assert!(
            ClasherError::from(GuardViolation::Busy {
                active: OperationStatus::Enhancing
            })
            .user_message()
            .starts_with("Another operation is already running")
        );
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: ClasherError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().contains("NotFound"));
    }
}
