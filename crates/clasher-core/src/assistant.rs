//! Assistant client interface.

use crate::error::Result;
use crate::media::ImagePayload;

/// Issues a single text-generation request to a language model.
///
/// Implementations fail with `ClasherError::Assistant` when the exchange does
/// not succeed and with `ClasherError::AssistantFormat` when the response holds
/// no completion. They never retry and never touch session state.
#[async_trait::async_trait]
pub trait AssistantClient: Send + Sync {
    /// Returns the first textual completion for `prompt`, optionally
    /// attaching `image` inline.
    async fn generate_text(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String>;
}
