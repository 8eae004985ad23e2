//! Query API client implementation
//!
//! This module provides the HTTP client for the question-answering backend:
//! fresh queries, adaptation retries and knowledge-graph reads.

pub mod models;
pub use models::*;

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::{ApiConfig, ServiceConfig};
use crate::core::{ClientBuilder, QueryTransport, RequestExecutor, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::services::common::{create_error_context, parse_error_response, ClientMetrics};
use crate::util::generate_request_id;
use graph_sanitizer::GraphPayload;

/// Fresh query endpoint
pub const QUERY_ENDPOINT: &str = "api/query";

/// Adaptation retry endpoint
pub const RETRY_ENDPOINT: &str = "api/query/retry";

/// Full knowledge graph endpoint
pub const GRAPH_ENDPOINT: &str = "api/graph/full";

/// Seed-centred neighbourhood endpoint
pub const SUBGRAPH_ENDPOINT: &str = "api/graph/subgraph";

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Request body of `POST /api/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

/// Request body of `POST /api/query/retry`
#[derive(Debug, Clone, Serialize)]
pub struct RetryRequest<'a> {
    pub question: &'a str,
    pub retry_count: u32,
    pub adaptation_actions: &'a [AdaptationAction],
}

/// HTTP client for the question-answering backend
#[derive(Debug)]
pub struct QueryApiClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: ApiConfig,

    /// Client metrics
    metrics: ClientMetrics,
}

impl QueryApiClient {
    /// Create a client from a resolved configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// Create a client around an already configured HTTP client
    pub fn with_http_client(config: ApiConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config,
            metrics: ClientMetrics::default(),
        }
    }

    /// Create a new builder for the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send a prepared request and decode the JSON response body.
    ///
    /// Exactly one attempt is made.
    async fn send<R>(&self, endpoint: &str, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request_id = generate_request_id();
        let context = create_error_context(self.name(), endpoint, &request_id);
        let start = Instant::now();

        self.metrics.record_request();
        debug!(endpoint, request_id = %request_id, "Sending request");

        let response = match request.header(REQUEST_ID_HEADER, &request_id).send().await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_outcome(start, false, None);
                warn!(endpoint, request_id = %request_id, error = %e, "Request failed before a response arrived");
                return Err(ServiceError::from(e).with_context(context));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.metrics.record_outcome(start, false, None);
                return Err(ServiceError::from(e).with_context(context.status_code(status.as_u16())));
            }
        };
        let received = Some(body.len() as u64);

        if !status.is_success() {
            self.metrics.record_outcome(start, false, received);
            warn!(endpoint, status = status.as_u16(), request_id = %request_id, "Backend returned an error status");
            return Err(parse_error_response(status, &body, context));
        }

        match serde_json::from_str::<R>(&body) {
            Ok(value) => {
                self.metrics.record_outcome(start, true, received);
                debug!(
                    endpoint,
                    status = status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request completed"
                );
                Ok(value)
            }
            Err(e) => {
                self.metrics.record_outcome(start, false, received);
                warn!(endpoint, request_id = %request_id, error = %e, "Response body has an unexpected shape");
                Err(ServiceError::protocol(format!("Unexpected response body from {}: {}", endpoint, e))
                    .with_context(context.status_code(status.as_u16())))
            }
        }
    }
}

/// Rewrite a 404 from a graph endpoint into a reportable message
fn graph_unavailable(error: ServiceError) -> ServiceError {
    if !error.is_not_found() {
        return error;
    }

    match error {
        ServiceError::WithContext { context, .. } => {
            ServiceError::not_found("graph endpoint not available").with_context(context)
        }
        _ => ServiceError::not_found("graph endpoint not available"),
    }
}

#[async_trait]
impl QueryTransport for QueryApiClient {
    async fn submit_query(&self, question: &str) -> Result<QueryResponse> {
        self.post(QUERY_ENDPOINT, &QueryRequest { question }, None).await
    }

    async fn submit_retry(
        &self,
        question: &str,
        retry_count: u32,
        actions: &[AdaptationAction],
    ) -> Result<QueryResponse> {
        let body = RetryRequest {
            question,
            retry_count,
            adaptation_actions: actions,
        };

        self.post(RETRY_ENDPOINT, &body, None).await
    }

    async fn fetch_graph(&self) -> Result<GraphPayload> {
        self.get(GRAPH_ENDPOINT, None).await.map_err(graph_unavailable)
    }

    async fn fetch_subgraph(&self, seeds: &[String], hops: u32) -> Result<GraphPayload> {
        let mut params = HashMap::new();
        params.insert("hops".to_string(), hops.to_string());

        self.post(SUBGRAPH_ENDPOINT, &seeds, Some(params))
            .await
            .map_err(graph_unavailable)
    }
}

impl ServiceClient for QueryApiClient {
    fn name(&self) -> &str {
        self.config.service_name()
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn metrics(&self) -> HashMap<String, String> {
        self.metrics.as_map()
    }
}

#[async_trait]
impl RequestExecutor for QueryApiClient {
    async fn get<R>(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let mut request = self.http_client.get(self.config.endpoint_url(endpoint));

        if let Some(params) = query_params {
            request = request.query(&params);
        }

        self.send(endpoint, request).await
    }

    async fn post<T, R>(
        &self,
        endpoint: &str,
        body: &T,
        query_params: Option<HashMap<String, String>>,
    ) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let mut request = self.http_client.post(self.config.endpoint_url(endpoint)).json(body);

        if let Some(params) = query_params {
            request = request.query(&params);
        }

        self.send(endpoint, request).await
    }
}
