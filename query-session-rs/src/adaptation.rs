//! Adaptation controller
//!
//! Retry eligibility is derived only from server-supplied signals on the
//! current result, and a result may be retried at most once. The predicate
//! here is the single source of truth for the retry trigger.

use std::sync::Arc;

use qa_sdk::models::QueryResponse;
use qa_sdk::QueryTransport;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::lifecycle::{describe_error, QuerySession};
use crate::notification::{Notification, NotificationKind};
use crate::state::{Rejection, Transition};

/// Retries allowed per question
pub const MAX_RETRIES: u32 = 1;

/// Why a result cannot be retried, worded for the retry trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RetryBlock {
    #[error("No adaptation suggested")]
    NoActions,

    #[error("Retry already used")]
    AlreadyRetried,

    #[error("Retry not recommended")]
    NotRecommended,
}

/// Check every retry condition, reporting the first that fails.
///
/// Absent fields count as not eligible.
pub fn retry_eligibility(result: &QueryResponse) -> Result<(), RetryBlock> {
    if result.adaptation_actions.is_empty() {
        return Err(RetryBlock::NoActions);
    }

    if result.retries_used() >= MAX_RETRIES {
        return Err(RetryBlock::AlreadyRetried);
    }

    if result.can_retry != Some(true) {
        return Err(RetryBlock::NotRecommended);
    }

    Ok(())
}

/// True when `result` may be retried
pub fn can_actually_retry(result: &QueryResponse) -> bool {
    retry_eligibility(result).is_ok()
}

/// Notification body for a successful retry
pub(crate) fn retry_success_message(patches: usize) -> String {
    match patches {
        0 => "Retry completed.".to_string(),
        1 => "Applied 1 adaptation patch.".to_string(),
        n => format!("Applied {} adaptation patches.", n),
    }
}

impl<T: QueryTransport + ?Sized> QuerySession<T> {
    /// Re-run the current result's question with its adaptation patches.
    ///
    /// The current result is read when this is called. Eligibility is checked
    /// again here, so an ineligible call is rejected without a request. On
    /// success the server's response replaces the result, including its
    /// `retry_count`; on failure the prior result stays and an error
    /// notification is raised.
    pub async fn retry(&self) -> Transition {
        let begun = self.cell().begin(|state| {
            let result = state.result.clone().ok_or(Rejection::NoResult)?;
            retry_eligibility(&result).map_err(Rejection::NotEligible)?;
            Ok(result)
        });

        let (sequence, result): (u64, Arc<QueryResponse>) = match begun {
            Ok(begun) => begun,
            Err(rejection) => {
                debug!(%rejection, "Retry rejected");
                return Transition::Rejected(rejection);
            }
        };

        let actions = &result.adaptation_actions;
        let retry_count = result.retries_used();
        info!(sequence, retry_count, actions = actions.len(), "Retrying query with adaptation patches");

        match self.transport().submit_retry(&result.question, retry_count, actions).await {
            Ok(response) => {
                let server_count = response.retries_used();
                let response = Arc::new(response);

                if !self.cell().finish(sequence, |state| state.result = Some(response)) {
                    debug!(sequence, "Discarding stale retry response");
                    return Transition::Discarded;
                }

                info!(sequence, retry_count = server_count, "Retry completed");
                self.notifications().raise(Notification::new(
                    NotificationKind::Success,
                    "Retry completed",
                    retry_success_message(actions.len()),
                    self.config().retry_success_notice,
                ));
                Transition::Completed
            }
            Err(error) => {
                let message = describe_error(&error);

                if !self.cell().finish(sequence, |state| state.error = Some(message.clone())) {
                    debug!(sequence, "Discarding stale retry failure");
                    return Transition::Discarded;
                }

                warn!(sequence, error = %error, "Retry failed");
                self.notifications().raise(Notification::new(
                    NotificationKind::Error,
                    "Retry failed",
                    message.clone(),
                    self.config().retry_error_notice,
                ));
                Transition::Failed(message)
            }
        }
    }

    /// Whether the retry trigger should be enabled right now
    pub fn retry_enabled(&self) -> bool {
        let state = self.state();
        !state.loading && state.result.as_deref().map_or(false, can_actually_retry)
    }

    /// Why the retry trigger is disabled, if it is disabled for a reason
    /// other than a request in flight
    pub fn retry_block(&self) -> Option<RetryBlock> {
        self.state()
            .result
            .as_deref()
            .and_then(|result| retry_eligibility(result).err())
    }
}
