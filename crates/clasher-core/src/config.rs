//! Configuration models.
//!
//! `ClasherConfig` is read from `config.toml`; `SecretConfig` from `secret.json`.
//! Every field has a default so an absent or partial file is valid.

use crate::animation::{AnimationOptions, DEFAULT_PLACEHOLDER_URL, FallbackPolicy};
use crate::error::Result;
use crate::media::VideoPayload;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ASSISTANT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_ASSISTANT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClasherConfig {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClasherConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
}

fn default_assistant_base_url() -> String {
    DEFAULT_ASSISTANT_BASE_URL.to_string()
}

fn default_assistant_model() -> String {
    DEFAULT_ASSISTANT_MODEL.to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_assistant_base_url(),
            model: default_assistant_model(),
        }
    }
}

/// Vertex AI prediction endpoint coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_project_id")]
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Replaces `https://{location}-aiplatform.googleapis.com` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub options: AnimationOptions,
}

fn default_project_id() -> String {
    "your-gcp-project-id".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_model_id() -> String {
    "image-to-video-generation-model".to_string()
}

impl AnimationConfig {
    /// Full `:predict` URL for the configured model.
    pub fn predict_url(&self) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.location));
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            base.trim_end_matches('/'),
            self.project_id,
            self.location,
            self.model_id
        )
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            location: default_location(),
            model_id: default_model_id(),
            base_url: None,
            options: AnimationOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Minimum time the animation busy status stays visible.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub fallback: FallbackPolicyConfig,
    #[serde(default)]
    pub templates: TemplateOverrides,
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl OrchestratorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            fallback: FallbackPolicyConfig::default(),
            templates: TemplateOverrides::default(),
        }
    }
}

/// Serialized form of [`FallbackPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackPolicyConfig {
    None,
    Placeholder {
        #[serde(default = "default_placeholder_url")]
        url: String,
    },
    Retry {
        attempts: u32,
    },
}

fn default_placeholder_url() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

impl Default for FallbackPolicyConfig {
    fn default() -> Self {
        Self::Placeholder {
            url: default_placeholder_url(),
        }
    }
}

impl From<&FallbackPolicyConfig> for FallbackPolicy {
    fn from(config: &FallbackPolicyConfig) -> Self {
        match config {
            FallbackPolicyConfig::None => FallbackPolicy::None,
            FallbackPolicyConfig::Placeholder { url } => FallbackPolicy::Placeholder {
                video: VideoPayload::remote(url.clone()),
            },
            FallbackPolicyConfig::Retry { attempts } => FallbackPolicy::Retry {
                attempts: *attempts,
            },
        }
    }
}

/// Optional replacements for the built-in assistant instructions.
///
/// Templates are Jinja; `{{ prompt }}` and `{{ previous_prompt }}` are available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surprise_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_story: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `clasher=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
    #[serde(default)]
    pub vertex: Option<VertexSecret>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexSecret {
    /// Short-lived OAuth2 bearer token.
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = ClasherConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClasherConfig::default());
        assert_eq!(config.orchestrator.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.assistant.model, DEFAULT_ASSISTANT_MODEL);
    }

    #[test]
    fn test_partial_document_overrides_fields() {
        let config = ClasherConfig::from_toml_str(
            r#"
[assistant]
model = "gemini-2.5-flash"

[animation]
project_id = "demo-project"
[animation.options]
quality = "1080p"
look = "natural"

[orchestrator]
settle_delay_ms = 250
fallback = { kind = "retry", attempts = 2 }
[orchestrator.templates]
enhance = "Make this better: {{ prompt }}"

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.assistant.model, "gemini-2.5-flash");
        assert_eq!(config.assistant.base_url, DEFAULT_ASSISTANT_BASE_URL);
        assert_eq!(config.animation.project_id, "demo-project");
        assert_eq!(config.animation.options.duration_seconds, 5);
        assert_eq!(config.orchestrator.settle_delay_ms, 250);
        assert_eq!(
            FallbackPolicy::from(&config.orchestrator.fallback),
            FallbackPolicy::Retry { attempts: 2 }
        );
        assert_eq!(
            config.orchestrator.templates.enhance.as_deref(),
            Some("Make this better: {{ prompt }}")
        );
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let err = ClasherConfig::from_toml_str("[assistant\nmodel=").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_predict_url() {
        let mut config = AnimationConfig::default();
        assert_eq!(
            config.predict_url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/your-gcp-project-id/locations/us-central1/publishers/google/models/image-to-video-generation-model:predict"
        );

        config.base_url = Some("http://localhost:9000/".to_string());
        assert!(config.predict_url().starts_with("http://localhost:9000/v1/projects/"));
    }
}
