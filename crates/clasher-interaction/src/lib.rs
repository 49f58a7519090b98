//! Remote endpoint clients for Clasher.
//!
//! - [`GeminiAssistantClient`]: text completions for prompt suggestion and refinement
//! - [`VertexAnimationClient`]: image+prompt-to-video predictions

mod http;

pub mod gemini_assistant;
pub mod vertex_animation;

pub use gemini_assistant::GeminiAssistantClient;
pub use vertex_animation::{INVALID_ANIMATION_MESSAGE, VertexAnimationClient};
