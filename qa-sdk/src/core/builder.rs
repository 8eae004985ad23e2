//! Client builder implementation
//!
//! Provides a builder for configuring and creating a `QueryApiClient`.

use std::time::Duration;

use reqwest::Client as ReqwestClient;

use crate::config::{ApiConfig, ServiceConfig};
use crate::error::{Result, ServiceError};
use crate::services::common::UserAgent;
use crate::services::query::QueryApiClient;

/// Builder for the query API client
pub struct ClientBuilder {
    /// Base configuration, overridden by the explicit setters below
    config: ApiConfig,

    /// Base URL for the service
    base_url: Option<String>,

    /// Request timeout
    timeout: Option<Duration>,

    /// User agent
    user_agent: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::from_config(ApiConfig::default())
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already resolved configuration
    pub fn from_config(config: ApiConfig) -> Self {
        Self {
            config,
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the base URL for the service
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve the effective configuration
    pub fn config(&self) -> Result<ApiConfig> {
        let mut config = self.config.clone();

        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout.as_secs().max(1);
        }
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }

        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Build an HTTP client with the configured settings
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        let config = self.config()?;
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout.unwrap_or_else(|| config.timeout()))
            .gzip(true);

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| UserAgent::default().to_string());
        builder = builder.user_agent(user_agent);

        builder
            .build()
            .map_err(|e| ServiceError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Build the query API client
    pub fn build(self) -> Result<QueryApiClient> {
        let config = self.config()?;
        let http_client = self.build_http_client()?;

        Ok(QueryApiClient::with_http_client(config, http_client))
    }
}
