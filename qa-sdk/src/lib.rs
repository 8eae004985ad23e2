//! # QA SDK
//!
//! Typed client for the question-answering backend and its retrieval,
//! evaluation and graph-construction agents.
//!
//! This crate provides:
//!
//! - The response data model (`QueryResponse`, `EvaluationResult`, `AdaptationAction`, ...)
//! - The `QueryTransport` seam used by the query controllers
//! - An HTTP implementation of that seam (`QueryApiClient`)
//! - A small error taxonomy separating network failures from protocol failures
//! - Configuration loading with environment-variable support
//!
//! The client never retries on its own: a failed call surfaces immediately
//! and the caller owns the retry policy.

// Re-export core modules
pub mod core;
pub use core::{ClientBuilder, QueryTransport, RequestExecutor, ServiceClient};

// Re-export service-specific modules
pub mod services;
pub use services::query::{self, models, QueryApiClient};

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, ErrorKind, Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{ApiConfig, ConfigProvider, ConfigProviderExt, ServiceConfig};

pub use graph_sanitizer::GraphPayload;

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> core::ClientBuilder {
    core::ClientBuilder::new()
}

/// Create a client configured from `QA_*` environment variables
pub fn client_from_env() -> Result<QueryApiClient> {
    let config = ApiConfig::from_env()?;
    QueryApiClient::new(config)
}
