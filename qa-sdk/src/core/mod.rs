//! Core abstractions for the QA SDK
//!
//! This module provides the trait interfaces the rest of the workspace is
//! written against:
//!
//! - `QueryTransport`: the three backend calls the query controllers need
//! - `ServiceClient`: identity and counters of a concrete client
//! - `RequestExecutor`: strongly typed HTTP verbs
//! - `ClientBuilder`: builder pattern for creating clients

pub mod builder;
pub use builder::ClientBuilder;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::models::{AdaptationAction, QueryResponse};
use graph_sanitizer::GraphPayload;

/// The backend operations consumed by the query controllers.
///
/// Implementations must not retry internally and must not cache. Connectivity
/// failures surface as `ErrorKind::Network`, unexpected bodies as
/// `ErrorKind::Protocol`.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Run a fresh query
    async fn submit_query(&self, question: &str) -> Result<QueryResponse>;

    /// Re-run a query with the server-suggested adaptation patches.
    ///
    /// The server is the authority on whether the retry is honored; callers
    /// read `retry_count` from the returned response.
    async fn submit_retry(
        &self,
        question: &str,
        retry_count: u32,
        actions: &[AdaptationAction],
    ) -> Result<QueryResponse>;

    /// Fetch the full knowledge graph
    async fn fetch_graph(&self) -> Result<GraphPayload>;

    /// Fetch the neighbourhood of the given seed labels
    async fn fetch_subgraph(&self, seeds: &[String], hops: u32) -> Result<GraphPayload>;
}

/// Base trait for concrete service clients
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The base URL for the service
    fn base_url(&self) -> &str;

    /// Request/success/error counters for this client
    fn metrics(&self) -> HashMap<String, String>;
}

/// Trait responsible for executing HTTP requests with strong typing
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a GET request
    async fn get<R>(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a POST request with a JSON body
    async fn post<T, R>(
        &self,
        endpoint: &str,
        body: &T,
        query_params: Option<HashMap<String, String>>,
    ) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}
