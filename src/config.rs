use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// OpenRouter API key. The commentary endpoint is disabled without it.
    pub openrouter_api_key: Option<String>,
    /// OpenRouter API base URL.
    pub openrouter_base_url: String,
    /// Referer header sent with OpenRouter requests.
    pub openrouter_referer: String,
    /// Model used for market commentary.
    pub openrouter_model: String,
    /// Time-to-live for cached quote history, in seconds.
    pub quote_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            host,
            port,
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            openrouter_base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            openrouter_referer: env::var("OPENROUTER_REFERER")
                .unwrap_or_else(|_| "http://localhost".to_string()),
            openrouter_model: env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| "mistralai/mistral-7b-instruct".to_string()),
            quote_cache_ttl_secs: env::var("QUOTE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(180),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8000,
            openrouter_api_key: Some("sk-test".to_string()),
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            openrouter_referer: "http://localhost".to_string(),
            openrouter_model: "mistralai/mistral-7b-instruct".to_string(),
            quote_cache_ttl_secs: 180,
        }
    }

    #[test]
    fn test_config_creation() {
        let config = sample_config();
        assert_eq!(config.port, 8000);
        assert_eq!(config.quote_cache_ttl_secs, 180);
        assert!(config.openrouter_api_key.is_some());
    }

    #[test]
    fn test_config_clone() {
        let config = sample_config();
        let cloned = config.clone();
        assert_eq!(cloned.host, config.host);
        assert_eq!(cloned.openrouter_model, config.openrouter_model);
    }

    #[test]
    fn test_config_without_api_key() {
        let config = Config {
            openrouter_api_key: None,
            ..sample_config()
        };
        assert!(config.openrouter_api_key.is_none());
    }
}
