//! Query lifecycle controller

use std::sync::Arc;

use qa_sdk::{QueryTransport, ServiceError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::guard::Guarded;
use crate::notification::Notifier;
use crate::state::{QueryState, Rejection, Transition};

/// Human-readable message for a transport failure
pub(crate) fn describe_error(error: &ServiceError) -> String {
    error.to_string()
}

/// Owns the `loading` / `result` / `error` state of one query surface.
///
/// Other components read the state through [`QuerySession::state`] or
/// [`QuerySession::subscribe`] and change it only through the operations
/// below. At most one request is in flight at a time; an operation invoked
/// while one is pending is rejected, not queued.
pub struct QuerySession<T: QueryTransport + ?Sized> {
    config: SessionConfig,
    cell: Guarded<QueryState>,
    notifier: Notifier,
    transport: Arc<T>,
}

impl<T: QueryTransport + ?Sized> QuerySession<T> {
    /// Create a session with default settings
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: Arc<T>, config: SessionConfig) -> Self {
        Self {
            config,
            cell: Guarded::new(),
            notifier: Notifier::new(),
            transport,
        }
    }

    /// Submit a fresh question.
    ///
    /// Clears any stale error but keeps the previous result visible until the
    /// new one arrives. A failure sets `error` and leaves `result` untouched.
    pub async fn submit(&self, question: &str) -> Transition {
        let question = question.trim();
        let min_chars = self.config.min_question_chars;

        if question.chars().count() < min_chars {
            debug!(min_chars, "Question too short, not submitting");
            return Transition::Rejected(Rejection::QuestionTooShort { min_chars });
        }

        let sequence = match self.cell.begin(|_| Ok(())) {
            Ok((sequence, ())) => sequence,
            Err(rejection) => {
                debug!(%rejection, "Submit rejected");
                return Transition::Rejected(rejection);
            }
        };

        info!(sequence, "Submitting query");

        match self.transport.submit_query(question).await {
            Ok(response) => {
                let response = Arc::new(response);

                if self.cell.finish(sequence, |state| state.result = Some(response)) {
                    debug!(sequence, "Query completed");
                    Transition::Completed
                } else {
                    debug!(sequence, "Discarding stale query response");
                    Transition::Discarded
                }
            }
            Err(error) => {
                let message = describe_error(&error);

                if self.cell.finish(sequence, |state| state.error = Some(message.clone())) {
                    warn!(sequence, error = %error, "Query failed");
                    Transition::Failed(message)
                } else {
                    debug!(sequence, "Discarding stale query failure");
                    Transition::Discarded
                }
            }
        }
    }

    /// Abandon the request in flight, if any.
    ///
    /// Its response will be discarded when it arrives. Returns whether a
    /// request was pending.
    pub fn abandon(&self) -> bool {
        let abandoned = self.cell.abandon();
        if abandoned {
            info!("Abandoned in-flight request");
        }
        abandoned
    }

    /// Current state snapshot
    pub fn state(&self) -> QueryState {
        self.cell.snapshot()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.cell.subscribe()
    }

    /// Outcome notifications raised by this session
    pub fn notifications(&self) -> &Notifier {
        &self.notifier
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub(crate) fn cell(&self) -> &Guarded<QueryState> {
        &self.cell
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}
