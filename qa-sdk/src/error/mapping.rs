//! Error mapping for backend HTTP responses
//!
//! The backend is a FastAPI application: error bodies are usually
//! `{"detail": "..."}` or, for request validation failures, a `detail` list.
//! Other services in front of it may answer with `message` or `error`.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};

/// Longest body excerpt kept in an error message
const MAX_BODY_EXCERPT: usize = 200;

/// Map a non-success HTTP response to a ServiceError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    context.status_code = Some(status.as_u16());
    context.add("category", classify_http_error(status));

    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => extract_message(&json).unwrap_or_else(|| status.to_string()),
        Err(_) => fallback_message(status, body),
    };

    match status {
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        _ => ServiceError::status(status.as_u16(), message),
    }
}

/// Pull a human readable message out of a JSON error body
fn extract_message(json: &Value) -> Option<String> {
    let field = json
        .get("detail")
        .or_else(|| json.get("message"))
        .or_else(|| json.get("error"))?;

    match field {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        // validation details are structured; keep them compact
        other => Some(other.to_string()),
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, crate::util::truncate_string(body, MAX_BODY_EXCERPT))
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 | 422 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}
