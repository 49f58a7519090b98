//! Global tracing subscriber setup.

use clasher_core::config::LoggingConfig;
use clasher_core::error::{ClasherError, Result};
use tracing_subscriber::EnvFilter;

/// Parses the configured level string, e.g. `info` or `clasher=debug,reqwest=warn`.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level).map_err(|e| {
        ClasherError::config(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Installs the global subscriber, plain or JSON per `config.json`.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config)?);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ClasherError::internal(format!("Failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_accepted() {
        let config = LoggingConfig {
            level: "clasher=debug,reqwest=warn".to_string(),
            json: false,
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_invalid_level_is_config_error() {
        let config = LoggingConfig {
            level: "clasher=verbose".to_string(),
            json: false,
        };
        assert!(matches!(env_filter(&config), Err(ClasherError::Config(_))));
    }

    #[test]
    fn test_json_subscriber_installs_once() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            json: true,
        };
        assert!(init_tracing(&config).is_ok());
        assert!(matches!(init_tracing(&config), Err(ClasherError::Internal(_))));
    }
}
