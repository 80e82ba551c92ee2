use super::{types::Config, ConfigError, StoreBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - The selected store backend has its configuration section
/// - GitHub store coordinates are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Store validation
    match config.store.backend {
        StoreBackend::Github => {
            let Some(github) = &config.store.github else {
                return Err(ConfigError::ValidationError(
                    "store.backend = \"github\" requires a [store.github] section".to_string(),
                ));
            };
            if github.repo.is_empty() || !github.repo.contains('/') {
                return Err(ConfigError::ValidationError(
                    "store.github.repo must be in owner/name form".to_string(),
                ));
            }
            if github.path.is_empty() {
                return Err(ConfigError::ValidationError(
                    "store.github.path cannot be empty".to_string(),
                ));
            }
            if github.token.is_empty() {
                return Err(ConfigError::ValidationError(
                    "store.github.token cannot be empty".to_string(),
                ));
            }
        }
        StoreBackend::File => {
            if config.store.file.is_none() {
                return Err(ConfigError::ValidationError(
                    "store.backend = \"file\" requires a [store.file] section".to_string(),
                ));
            }
        }
    }

    Ok(())
}
