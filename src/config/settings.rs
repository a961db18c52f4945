use std::env;

/// Applied when `CACHE_EXPIRATION_MINUTES` is absent or unparsable.
const DEFAULT_CACHE_EXPIRATION_MINUTES: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub ether_token: String,
    pub redis_url: String,
    pub cache_expiration_minutes: u64,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            ether_token: env::var("ETHER_TOKEN").unwrap_or_default(),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string()),
            cache_expiration_minutes: env::var("CACHE_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_EXPIRATION_MINUTES),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    pub fn validate_and_log(&self) {
        log::info!(
            "Configuration loaded: redis_url={}, cache_expiration_minutes={}, server_port={}, ether_token={}",
            self.redis_url,
            self.cache_expiration_minutes,
            self.server_port,
            if self.ether_token.is_empty() { "<missing>" } else { "<set>" },
        );
        if self.ether_token.is_empty() {
            log::error!("ETHER_TOKEN cannot be empty.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Environment access is process-global, so every case shares one test.
    #[test]
    fn from_env_applies_defaults_and_overrides() {
        env::remove_var("ETHER_TOKEN");
        env::remove_var("REDIS_URL");
        env::remove_var("CACHE_EXPIRATION_MINUTES");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.ether_token, "");
        assert_eq!(config.redis_url, "redis://127.0.0.1/");
        assert_eq!(config.cache_expiration_minutes, 5);
        assert_eq!(config.server_port, 3000);

        env::set_var("ETHER_TOKEN", "demo-token");
        env::set_var("REDIS_URL", "redis://cache.internal:6379/");
        env::set_var("CACHE_EXPIRATION_MINUTES", "10");
        env::set_var("SERVER_PORT", "8080");

        let config = Config::from_env();
        assert_eq!(config.ether_token, "demo-token");
        assert_eq!(config.redis_url, "redis://cache.internal:6379/");
        assert_eq!(config.cache_expiration_minutes, 10);
        assert_eq!(config.server_port, 8080);

        // An unparsable window falls back to the default rather than failing.
        env::set_var("CACHE_EXPIRATION_MINUTES", "soon");
        assert_eq!(Config::from_env().cache_expiration_minutes, 5);

        env::remove_var("ETHER_TOKEN");
        env::remove_var("REDIS_URL");
        env::remove_var("CACHE_EXPIRATION_MINUTES");
        env::remove_var("SERVER_PORT");
    }
}
