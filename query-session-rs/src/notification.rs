//! Transient outcome notifications
//!
//! At most one notification is current. Raising a new one replaces the
//! previous one outright, and each notification closes itself after its own
//! `auto_close` duration unless dismissed first. An auto-close timer only
//! ever closes the notification that scheduled it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Assigned by the notifier when raised
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub open: bool,
    pub auto_close: Duration,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        auto_close: Duration,
    ) -> Self {
        Self {
            id: 0,
            kind,
            title: title.into(),
            message: message.into(),
            open: true,
            auto_close,
        }
    }
}

/// Holder of the current notification
#[derive(Debug)]
pub struct Notifier {
    current: Arc<watch::Sender<Option<Notification>>>,
    next_id: AtomicU64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
            next_id: AtomicU64::new(0),
        }
    }

    /// Show `notification`, pre-empting the current one, and schedule its
    /// auto-close. Returns the assigned id.
    ///
    /// Outside a tokio runtime nothing can be scheduled and the notification
    /// stays open until dismissed.
    pub fn raise(&self, mut notification: Notification) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let auto_close = notification.auto_close;

        notification.id = id;
        notification.open = true;
        debug!(id, kind = ?notification.kind, title = %notification.title, "Raising notification");
        self.current.send_replace(Some(notification));

        match Handle::try_current() {
            Ok(handle) => {
                let current = Arc::clone(&self.current);
                handle.spawn(async move {
                    tokio::time::sleep(auto_close).await;
                    if close(&current, Some(id)) {
                        debug!(id, "Notification auto-closed");
                    }
                });
            }
            Err(_) => warn!(id, "No async runtime, notification stays open until dismissed"),
        }

        id
    }

    /// Close the current notification early
    pub fn dismiss(&self) -> bool {
        close(&self.current, None)
    }

    /// The current notification, open or closed
    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// The current notification if it is still open
    pub fn open(&self) -> Option<Notification> {
        self.current().filter(|notification| notification.open)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }
}

/// Close the current notification, or only notification `id` when given
fn close(current: &watch::Sender<Option<Notification>>, id: Option<u64>) -> bool {
    current.send_if_modified(|slot| match slot {
        Some(notification) if notification.open && id.map_or(true, |id| id == notification.id) => {
            notification.open = false;
            true
        }
        _ => false,
    })
}
