//! Tests for configuration management functionality
//!
//! These tests verify that the configuration providers and `ApiConfig`
//! loading work correctly.

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use crate::config::{
        ApiConfig, CompositeConfigProvider, ConfigProvider, ConfigProviderExt, EnvConfigProvider,
        MemoryConfigProvider, ServiceConfig, DEFAULT_BASE_URL,
    };
    use crate::error::ServiceError;

    #[test]
    fn test_memory_config_provider_typed_getters() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_timeout_seconds", "30");
        provider.set("verbose", "yes");

        assert_eq!(provider.get_int("api_timeout_seconds").unwrap(), 30);
        assert!(provider.get_bool("verbose").unwrap());

        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.get_int_or("missing", 60), 60);
        assert!(!provider.get_bool_or("missing", false));

        // Not an integer
        provider.set("api_base_url", "http://qa.internal");
        assert!(provider.get_int("api_base_url").is_err());
    }

    #[test]
    fn test_env_config_provider() {
        env::set_var("QATEST_ENV_API_BASE_URL", "http://env.example:9000");
        env::set_var("QATEST_ENV_API_TIMEOUT_SECONDS", "15");

        let provider = EnvConfigProvider::new().with_prefix("QATEST").with_namespace("ENV");

        assert_eq!(provider.get_string("api_base_url").unwrap(), "http://env.example:9000");
        assert_eq!(provider.get_int("api_timeout_seconds").unwrap(), 15);
        assert!(provider.get_string("api_user_agent").is_err());

        env::remove_var("QATEST_ENV_API_BASE_URL");
        env::remove_var("QATEST_ENV_API_TIMEOUT_SECONDS");
    }

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.base_url, "http://localhost:7000");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_config_falls_back_to_default_base_url() {
        let provider = MemoryConfigProvider::new();
        let config = ApiConfig::from_provider(&provider).unwrap();

        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn test_api_config_from_provider_normalizes_base_url() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_base_url", " https://qa.example.com/ ");
        provider.set("api_timeout_seconds", "45");
        provider.set("api_user_agent", "qa-console/test");

        let config = ApiConfig::from_provider(&provider).unwrap();

        assert_eq!(config.base_url, "https://qa.example.com");
        assert_eq!(config.timeout_seconds, 45);
        assert_eq!(config.user_agent.as_deref(), Some("qa-console/test"));
        assert_eq!(config.endpoint_url("api/query"), "https://qa.example.com/api/query");
        assert_eq!(config.endpoint_url("/api/graph/full"), "https://qa.example.com/api/graph/full");
    }

    #[test]
    fn test_api_config_rejects_invalid_values() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_base_url", "ftp://files.example.com");
        assert!(matches!(
            ApiConfig::from_provider(&provider),
            Err(ServiceError::Configuration(_))
        ));

        let mut provider = MemoryConfigProvider::new();
        provider.set("api_base_url", "not a url");
        assert!(ApiConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set("api_timeout_seconds", "0");
        assert!(ApiConfig::from_provider(&provider).is_err());

        let config = ApiConfig {
            base_url: String::new(),
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_composite_provider_prefers_earlier_sources() {
        let mut overrides = MemoryConfigProvider::new();
        overrides.set("api_base_url", "http://override:7000");

        let mut defaults = MemoryConfigProvider::new();
        defaults.set("api_base_url", "http://defaults:7000");
        defaults.set("api_timeout_seconds", "10");

        let provider = CompositeConfigProvider::new()
            .with_provider(overrides)
            .with_provider(defaults);

        let config = ApiConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "http://override:7000");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_service_name() {
        assert_eq!(ApiConfig::default().service_name(), "qa-backend");
    }
}
