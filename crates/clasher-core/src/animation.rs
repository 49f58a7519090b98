//! Animation client interface, request options and the failure fallback policy.

use crate::error::Result;
use crate::media::{ImagePayload, VideoPayload};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Demo clip substituted when animation generation fails.
pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Quality {
    #[serde(rename = "720p")]
    #[strum(serialize = "720p")]
    Hd,
    #[serde(rename = "1080p")]
    #[strum(serialize = "1080p")]
    FullHd,
    #[default]
    #[serde(rename = "4k")]
    #[strum(serialize = "4k")]
    Uhd,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Look {
    #[default]
    Cinematic,
    Natural,
    Animated,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MotionRealism {
    Low,
    Medium,
    #[default]
    High,
}

/// Generation parameters forwarded verbatim to the animation endpoint.
///
/// They only shape the request body; local control flow ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub look: Look,
    #[serde(default)]
    pub motion_realism: MotionRealism,
}

fn default_duration_seconds() -> u32 {
    5
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            quality: Quality::default(),
            look: Look::default(),
            motion_realism: MotionRealism::default(),
        }
    }
}

/// Issues a single image+prompt-to-video request.
#[async_trait::async_trait]
pub trait AnimationClient: Send + Sync {
    /// Returns the video of the first prediction, or `ClasherError::Animation`
    /// on transport failure, non-success status or a missing video field.
    async fn generate_animation(
        &self,
        prompt: &str,
        image: &ImagePayload,
        options: &AnimationOptions,
    ) -> Result<VideoPayload>;
}

/// What the orchestrator does after the animation client fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report the error and end in `OperationStatus::Error`.
    None,
    /// Report the error at once, then after the settling delay store `video`
    /// as if generation had succeeded.
    Placeholder { video: VideoPayload },
    /// Re-issue the request up to `attempts` more times before reporting.
    Retry { attempts: u32 },
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::Placeholder {
            video: VideoPayload::remote(DEFAULT_PLACEHOLDER_URL),
        }
    }
}
