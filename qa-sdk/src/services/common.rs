//! Common utilities for service clients
//!
//! This module provides shared functionality for the HTTP clients.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::error::{ErrorContext, ServiceError};

/// UserAgent structure for identifying the client to the backend
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "qa-sdk".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: Some("query-client".to_string()),
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Per-client request counters
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Total requests made
    request_count: AtomicU64,

    /// Total successful responses
    success_count: AtomicU64,

    /// Total errors
    error_count: AtomicU64,

    /// Total bytes received
    bytes_received: AtomicU64,

    /// Latency of the last completed request, in microseconds
    last_latency_us: AtomicU64,
}

impl ClientMetrics {
    /// Record a request
    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a request started at `start_time`
    pub fn record_outcome(&self, start_time: Instant, is_success: bool, bytes_received: Option<u64>) {
        if is_success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }

        if let Some(bytes) = bytes_received {
            self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
        }

        let latency = start_time.elapsed().as_micros().min(u64::MAX as u128) as u64;
        self.last_latency_us.store(latency, Ordering::Relaxed);
    }

    /// Get all metrics as a map
    pub fn as_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("request_count".to_string(), self.request_count.load(Ordering::Relaxed).to_string());
        map.insert("success_count".to_string(), self.success_count.load(Ordering::Relaxed).to_string());
        map.insert("error_count".to_string(), self.error_count.load(Ordering::Relaxed).to_string());
        map.insert("bytes_received".to_string(), self.bytes_received.load(Ordering::Relaxed).to_string());
        map.insert(
            "last_latency".to_string(),
            format!("{:.2}ms", self.last_latency_us.load(Ordering::Relaxed) as f64 / 1000.0),
        );

        map
    }
}

/// Create error context for an HTTP request
pub fn create_error_context(service_name: &str, endpoint: &str, request_id: &str) -> ErrorContext {
    ErrorContext::for_service(service_name)
        .endpoint(endpoint)
        .request_id(request_id)
}

/// Map a non-success response whose body has already been read
pub fn parse_error_response(
    status: reqwest::StatusCode,
    body: &str,
    mut context: ErrorContext,
) -> ServiceError {
    let error = crate::error::mapping::map_http_error(status, body, &mut context);
    error.with_context(context)
}
