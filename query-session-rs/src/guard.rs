//! Single-writer state cell with a stale-response guard
//!
//! Every issued request takes the next sequence number. A completion is
//! applied only while its number is still the latest issued; `abandon`
//! bumps the counter so a pending request can never land. Sequence checks
//! and state writes happen under the channel's write lock.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::state::{InFlight, Rejection};

#[derive(Debug)]
pub(crate) struct Guarded<S> {
    state: watch::Sender<S>,
    sequence: AtomicU64,
}

impl<S: InFlight + Clone + Default> Guarded<S> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(S::default());
        Self {
            state,
            sequence: AtomicU64::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    /// Enter loading if idle and `check` accepts the current state.
    ///
    /// `check` sees the state as of this call, so callers act on the value
    /// present when the operation was invoked.
    pub(crate) fn begin<R>(
        &self,
        check: impl FnOnce(&S) -> Result<R, Rejection>,
    ) -> Result<(u64, R), Rejection> {
        let mut outcome = Err(Rejection::InFlight);

        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }

            match check(&*state) {
                Ok(value) => {
                    state.start_loading();
                    let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                    outcome = Ok((sequence, value));
                    true
                }
                Err(rejection) => {
                    outcome = Err(rejection);
                    false
                }
            }
        });

        outcome
    }

    /// Apply a completion if `sequence` is still current. Returns false for
    /// a stale completion, which leaves the state untouched.
    pub(crate) fn finish(&self, sequence: u64, apply: impl FnOnce(&mut S)) -> bool {
        let mut applied = false;

        self.state.send_if_modified(|state| {
            if self.sequence.load(Ordering::SeqCst) != sequence {
                return false;
            }

            apply(state);
            state.stop_loading();
            applied = true;
            true
        });

        applied
    }

    /// Invalidate any in-flight request and leave loading
    pub(crate) fn abandon(&self) -> bool {
        let mut was_loading = false;

        self.state.send_if_modified(|state| {
            self.sequence.fetch_add(1, Ordering::SeqCst);
            was_loading = state.is_loading();
            state.stop_loading();
            was_loading
        });

        was_loading
    }
}
