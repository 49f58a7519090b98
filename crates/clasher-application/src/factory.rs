use crate::orchestrator::Orchestrator;
use clasher_core::config::ClasherConfig;
use clasher_core::error::{ClasherError, Result};
use clasher_core::secret::SecretService;
use clasher_infrastructure::ConfigService;
use clasher_interaction::{GeminiAssistantClient, VertexAnimationClient};
use std::sync::Arc;

/// Factory for wiring an [`Orchestrator`] to the real endpoint clients.
///
/// Configuration comes from `config.toml`, credentials from the secret service.
pub struct OrchestratorFactory {
    /// Source of `config.toml`
    config_service: Arc<ConfigService>,
    /// Source of API credentials
    secret_service: Arc<dyn SecretService>,
}

impl OrchestratorFactory {
    pub fn new(config_service: Arc<ConfigService>, secret_service: Arc<dyn SecretService>) -> Self {
        Self {
            config_service,
            secret_service,
        }
    }

    /// Loads the current configuration and builds a fresh session.
    pub async fn create(&self) -> Result<Orchestrator> {
        let config = self.config_service.get_config().await?;
        self.create_with_config(&config).await
    }

    /// Builds a fresh session from an explicit configuration.
    pub async fn create_with_config(&self, config: &ClasherConfig) -> Result<Orchestrator> {
        if !self.secret_service.secret_file_exists().await {
            return Err(ClasherError::config(
                "secret.json not found; add the Gemini and Vertex credentials",
            ));
        }

        let assistant =
            GeminiAssistantClient::try_from_secrets(self.secret_service.as_ref(), &config.assistant)
                .await?;
        let animation =
            VertexAnimationClient::try_from_secrets(self.secret_service.as_ref(), &config.animation)
                .await?;

        tracing::info!(
            target: "clasher::factory",
            model = %assistant.model(),
            endpoint = %animation.endpoint(),
            "Creating session"
        );

        Orchestrator::from_config(
            Arc::new(assistant),
            Arc::new(animation),
            &config.orchestrator,
            config.animation.options.clone(),
        )
    }
}
