pub mod settings;

pub use settings::Config;

use crate::error::LookupError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// Refuses to start without the resolution backend token.
pub fn load_config() -> Result<Arc<settings::Config>, LookupError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = settings::Config::from_env();

    if config.ether_token.is_empty() {
        return Err(LookupError::ConfigError(
            "ETHER_TOKEN cannot be empty".to_string(),
        ));
    }
    if config.redis_url.is_empty() {
        return Err(LookupError::ConfigError(
            "REDIS_URL cannot be empty".to_string(),
        ));
    }

    config.validate_and_log();

    Ok(Arc::new(config))
}
