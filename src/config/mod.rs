use crate::error::{ApiError, Result};
use crate::services::{
    catalog::DEFAULT_CATALOG_LIMIT, recommendation::DEFAULT_RECOMMENDATIONS_PER_CATEGORY,
};
use serde::Deserialize;
use std::env;
use std::fmt;

/// Application configuration, read from defaults and `APP_*` environment variables
#[derive(Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub catalog_path: String,
    pub catalog_limit: usize,
    pub recommendations_per_category: usize,
    pub embedding_batch_size: usize,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000_i64)?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("chat_model", "gpt-4o")?
            .set_default("embedding_model", "text-embedding-ada-002")?
            .set_default("catalog_path", "myntra_top500.csv")?
            .set_default("catalog_limit", DEFAULT_CATALOG_LIMIT as i64)?
            .set_default(
                "recommendations_per_category",
                DEFAULT_RECOMMENDATIONS_PER_CATEGORY as i64,
            )?
            .set_default("embedding_batch_size", 64_i64)?
            .set_default("request_timeout_secs", 60_i64)?
            .add_source(config::Environment::with_prefix("APP").try_parsing(true))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;

        if config.openai_api_key.trim().is_empty() {
            config.openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Missing APP_OPENAI_API_KEY (or OPENAI_API_KEY) environment variable".to_string(),
            ));
        }
        if self.catalog_limit == 0 {
            return Err(ApiError::ConfigError(
                "catalog_limit must be greater than zero".to_string(),
            ));
        }
        if self.recommendations_per_category == 0
            || self.recommendations_per_category > self.catalog_limit
        {
            return Err(ApiError::ConfigError(format!(
                "recommendations_per_category must be between 1 and catalog_limit ({})",
                self.catalog_limit
            )));
        }
        if self.embedding_batch_size == 0 {
            return Err(ApiError::ConfigError(
                "embedding_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("catalog_path", &self.catalog_path)
            .field("catalog_limit", &self.catalog_limit)
            .field(
                "recommendations_per_category",
                &self.recommendations_per_category,
            )
            .field("embedding_batch_size", &self.embedding_batch_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8000,
            openai_api_key: "sk-test".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            catalog_path: "catalog.csv".to_string(),
            catalog_limit: 50,
            recommendations_per_category: 2,
            embedding_batch_size: 64,
            request_timeout_secs: 60,
        }
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let mut config = sample();
        config.openai_api_key = "   ".to_string();
        assert!(matches!(config.validate(), Err(ApiError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = sample();
        config.catalog_limit = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.embedding_batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.recommendations_per_category = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.recommendations_per_category = usize::MAX;
        assert!(config.validate().is_err());

        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }

    // Environment variables are process-wide, so every env-driven case lives in this one test.
    #[test]
    fn test_load_layers_environment_over_defaults() {
        env::remove_var("APP_OPENAI_API_KEY");
        env::set_var("OPENAI_API_KEY", "sk-fallback");
        env::set_var("APP_PORT", "9090");

        let loaded = Config::load();

        env::remove_var("APP_PORT");
        env::remove_var("OPENAI_API_KEY");

        let config = loaded.unwrap();
        assert_eq!(config.openai_api_key, "sk-fallback");
        assert_eq!(config.port, 9090);
        assert_eq!(config.catalog_limit, DEFAULT_CATALOG_LIMIT);
        assert_eq!(
            config.recommendations_per_category,
            DEFAULT_RECOMMENDATIONS_PER_CATEGORY
        );
        assert_eq!(config.embedding_batch_size, 64);
        assert_eq!(config.request_timeout_secs, 60);

        env::set_var("APP_OPENAI_API_KEY", "sk-app");
        env::set_var("OPENAI_API_KEY", "sk-fallback");
        let loaded = Config::load();
        env::remove_var("APP_OPENAI_API_KEY");
        env::remove_var("OPENAI_API_KEY");
        assert_eq!(loaded.unwrap().openai_api_key, "sk-app");

        assert!(matches!(Config::load(), Err(ApiError::ConfigError(_))));
    }
}
