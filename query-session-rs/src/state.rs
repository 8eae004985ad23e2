//! Controller state and operation outcomes

use std::sync::Arc;

use qa_sdk::models::QueryResponse;
use thiserror::Error;

use crate::adaptation::RetryBlock;

/// State of one query surface.
///
/// `result` is replaced wholesale by each successful submit or retry and is
/// never cleared by a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub loading: bool,
    pub result: Option<Arc<QueryResponse>>,
    pub error: Option<String>,
}

/// Outcome of a controller operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The response was applied to the state
    Completed,
    /// The request failed; the message was stored in `error`
    Failed(String),
    /// The operation was a no-op
    Rejected(Rejection),
    /// The response arrived after the request was abandoned or superseded
    Discarded,
}

impl Transition {
    /// True when the state now holds a new response
    pub fn is_completed(&self) -> bool {
        matches!(self, Transition::Completed)
    }
}

/// Why an operation did not issue a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("A request is already in flight")]
    InFlight,

    #[error("Question must be at least {min_chars} characters")]
    QuestionTooShort { min_chars: usize },

    #[error("No result to retry")]
    NoResult,

    #[error("{0}")]
    NotEligible(RetryBlock),
}

/// Shared view of the in-flight flags of a controller state
pub(crate) trait InFlight {
    fn is_loading(&self) -> bool;

    /// Enter loading and clear any stale error
    fn start_loading(&mut self);

    fn stop_loading(&mut self);
}

impl InFlight for QueryState {
    fn is_loading(&self) -> bool {
        self.loading
    }

    fn start_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn stop_loading(&mut self) {
        self.loading = false;
    }
}
