//! # Query Session
//!
//! Client-side controllers for the question-answering backend:
//!
//! - [`QuerySession`]: the request / response / error lifecycle of one query
//!   surface, including the one-shot adaptation retry
//! - [`Notifier`]: transient, auto-closing outcome notifications
//! - [`GraphExplorer`]: loading and sanitizing the knowledge graph view
//!
//! Controllers never return transport errors. Every operation reports a
//! [`Transition`]; failures are folded into the published state as a
//! human-readable message.
//!
//! ```no_run
//! use std::sync::Arc;
//! use query_session::{QuerySession, Transition};
//!
//! # async fn run() -> qa_sdk::Result<()> {
//! let client = Arc::new(qa_sdk::client_from_env()?);
//! let session = QuerySession::new(client);
//!
//! if session.submit("How do retrieval agents rank passages?").await == Transition::Completed
//!     && session.retry_enabled()
//! {
//!     session.retry().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod adaptation;
pub mod config;
pub mod graph;
pub mod lifecycle;
pub mod notification;
pub mod state;

mod guard;

pub use adaptation::{can_actually_retry, retry_eligibility, RetryBlock, MAX_RETRIES};
pub use config::SessionConfig;
pub use graph::{GraphExplorer, GraphState};
pub use lifecycle::QuerySession;
pub use notification::{Notification, NotificationKind, Notifier};
pub use state::{QueryState, Rejection, Transition};
