//! GeminiAssistantClient - Direct REST client for Gemini `generateContent`.
//!
//! Sends one user turn (instruction text plus an optional inline image) and
//! returns the first textual completion.

use crate::http::google_error_message;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use clasher_core::assistant::AssistantClient;
use clasher_core::config::{AssistantConfig, DEFAULT_ASSISTANT_BASE_URL};
use clasher_core::error::{ClasherError, Result};
use clasher_core::media::ImagePayload;
use clasher_core::secret::SecretService;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Assistant implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAssistantClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAssistantClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_ASSISTANT_BASE_URL.to_string(),
        }
    }

    /// Creates a client from configuration and an API key.
    pub fn from_config(config: &AssistantConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key, config.model.clone()).with_base_url(config.base_url.clone())
    }

    /// Loads the API key through the secret service.
    pub async fn try_from_secrets(
        secrets: &dyn SecretService,
        config: &AssistantConfig,
    ) -> Result<Self> {
        let secret_config = secrets.load_secrets().await?;
        let gemini = secret_config.gemini.ok_or_else(|| {
            ClasherError::config("Gemini configuration not found in secret.json")
        })?;
        Ok(Self::from_config(config, gemini.api_key))
    }

    /// Overrides the endpoint root (`.../v1beta/models`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url.trim_end_matches('/'),
            model = self.model,
            api_key = self.api_key
        )
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        // The URL carries the API key, so it is never logged.
        tracing::debug!(target: "clasher::assistant", model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let err = err.without_url();
                tracing::error!(target: "clasher::assistant", "Gemini API request failed: {}", err);
                ClasherError::assistant(None, format!("request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let detail = google_error_message(&body_text).unwrap_or(body_text);
            tracing::error!(target: "clasher::assistant", status = status.as_u16(), "Gemini API error: {}", detail);
            return Err(ClasherError::assistant(Some(status.as_u16()), detail));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            let err = err.without_url();
            tracing::error!(target: "clasher::assistant", "Failed to parse Gemini response: {}", err);
            ClasherError::assistant_format(format!("unparsable body: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait::async_trait]
impl AssistantClient for GeminiAssistantClient {
    async fn generate_text(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String> {
        let request = build_request(prompt, image);
        self.send_request(&request).await
    }
}

fn build_request(prompt: &str, image: Option<&ImagePayload>) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: prompt.to_string(),
    }];
    if let Some(image) = image {
        parts.push(Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type.clone(),
                data: BASE64_STANDARD.encode(&image.bytes),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            tracing::error!(target: "clasher::assistant", "Gemini API returned no text in the first candidate");
            ClasherError::assistant_format("no text in the first candidate")
        })
}
