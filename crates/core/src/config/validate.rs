use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Both remote API keys are configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tmdb.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key must be configured".to_string(),
        ));
    }

    if config.youtube.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "youtube.api_key must be configured".to_string(),
        ));
    }

    Ok(())
}
