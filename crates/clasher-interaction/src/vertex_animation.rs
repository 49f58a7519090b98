//! VertexAnimationClient - image+prompt-to-video through a Vertex AI `:predict` endpoint.

use crate::http::google_error_message_only;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use clasher_core::animation::{AnimationClient, AnimationOptions};
use clasher_core::config::AnimationConfig;
use clasher_core::error::{ClasherError, Result};
use clasher_core::media::{ImagePayload, VideoPayload};
use clasher_core::secret::SecretService;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Shown when the endpoint answers without a video.
pub const INVALID_ANIMATION_MESSAGE: &str =
    "The AI did not return a valid animation. Please try a different prompt.";

/// Animation implementation that calls a Vertex AI publisher model.
#[derive(Clone)]
pub struct VertexAnimationClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl VertexAnimationClient {
    /// Creates a client for a full `:predict` URL.
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &AnimationConfig, access_token: impl Into<String>) -> Self {
        Self::new(config.predict_url(), access_token)
    }

    /// Loads the bearer token through the secret service.
    pub async fn try_from_secrets(
        secrets: &dyn SecretService,
        config: &AnimationConfig,
    ) -> Result<Self> {
        let secret_config = secrets.load_secrets().await?;
        let vertex = secret_config.vertex.ok_or_else(|| {
            ClasherError::config("Vertex configuration not found in secret.json")
        })?;
        Ok(Self::from_config(config, vertex.access_token))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_request(&self, body: &PredictRequest<'_>) -> Result<VideoPayload> {
        tracing::debug!(target: "clasher::animation", endpoint = %self.endpoint, "Sending predict request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(target: "clasher::animation", "Animation API request failed: {}", err);
                ClasherError::animation(format!("Animation API request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::error!(target: "clasher::animation", status = status.as_u16(), "Animation API error: {}", body_text);
            let message = google_error_message_only(&body_text).unwrap_or_else(|| {
                format!(
                    "Animation API request failed with status {}",
                    status.as_u16()
                )
            });
            return Err(ClasherError::animation(message));
        }

        let parsed: PredictResponse = response.json().await.map_err(|err| {
            tracing::error!(target: "clasher::animation", "Unexpected Animation API response: {}", err);
            ClasherError::animation(INVALID_ANIMATION_MESSAGE)
        })?;

        extract_video(parsed)
    }
}

#[async_trait::async_trait]
impl AnimationClient for VertexAnimationClient {
    async fn generate_animation(
        &self,
        prompt: &str,
        image: &ImagePayload,
        options: &AnimationOptions,
    ) -> Result<VideoPayload> {
        let request = build_request(prompt, image, options);
        self.send_request(&request).await
    }
}

fn build_request<'a>(
    prompt: &'a str,
    image: &ImagePayload,
    options: &'a AnimationOptions,
) -> PredictRequest<'a> {
    PredictRequest {
        instances: vec![Instance {
            prompt,
            image: EncodedImage {
                bytes_base64_encoded: BASE64_STANDARD.encode(&image.bytes),
            },
        }],
        parameters: options,
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: &'a AnimationOptions,
}

#[derive(Serialize)]
struct Instance<'a> {
    prompt: &'a str,
    image: EncodedImage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedImage {
    bytes_base64_encoded: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Option<Vec<Prediction>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

fn extract_video(response: PredictResponse) -> Result<VideoPayload> {
    let encoded = response
        .predictions
        .and_then(|predictions| predictions.into_iter().next())
        .and_then(|prediction| prediction.bytes_base64_encoded)
        .filter(|encoded| !encoded.is_empty())
        .ok_or_else(|| {
            tracing::error!(target: "clasher::animation", "Animation API response has no video in the first prediction");
            ClasherError::animation(INVALID_ANIMATION_MESSAGE)
        })?;

    let bytes = BASE64_STANDARD.decode(encoded.trim()).map_err(|err| {
        tracing::error!(target: "clasher::animation", "Animation payload is not valid base64: {}", err);
        ClasherError::animation(INVALID_ANIMATION_MESSAGE)
    })?;

    Ok(VideoPayload::inline(bytes))
}
