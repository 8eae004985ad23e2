//! Session settings

use std::time::Duration;

use qa_sdk::config::DEFAULT_PROVIDER;
use qa_sdk::{ConfigProvider, ConfigProviderExt, Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Tunables of a [`QuerySession`](crate::QuerySession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Shortest question, in characters after trimming, that is submitted
    pub min_question_chars: usize,

    /// How long a retry success notification stays open
    pub retry_success_notice: Duration,

    /// How long a retry failure notification stays open
    pub retry_error_notice: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_question_chars: 3,
            retry_success_notice: Duration::from_millis(3000),
            retry_error_notice: Duration::from_millis(3600),
        }
    }
}

impl SessionConfig {
    /// Load from a config provider.
    ///
    /// Keys: `session_min_question_chars`, `session_retry_success_notice_ms`,
    /// `session_retry_error_notice_ms`. Missing keys keep their defaults.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let min_question_chars = provider.get_int_or(
            "session_min_question_chars",
            defaults.min_question_chars as i64,
        );
        let success_ms = provider.get_int_or(
            "session_retry_success_notice_ms",
            defaults.retry_success_notice.as_millis() as i64,
        );
        let error_ms = provider.get_int_or(
            "session_retry_error_notice_ms",
            defaults.retry_error_notice.as_millis() as i64,
        );

        Ok(Self {
            min_question_chars: non_negative("session_min_question_chars", min_question_chars)? as usize,
            retry_success_notice: Duration::from_millis(non_negative("session_retry_success_notice_ms", success_ms)?),
            retry_error_notice: Duration::from_millis(non_negative("session_retry_error_notice_ms", error_ms)?),
        })
    }

    /// Load from `QA_SESSION_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }
}

fn non_negative(key: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| ServiceError::configuration(format!("{} must not be negative, got {}", key, value)))
}
