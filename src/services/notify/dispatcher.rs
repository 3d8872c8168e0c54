//! Fire-and-forget notice delivery.
//!
//! `dispatch` returns before the notification service is contacted. The outcome of
//! every delivery is logged and then dropped; nothing is retried.
use std::{sync::Arc, time::Duration};

use tokio_util::task::TaskTracker;

use super::{client::NotificationSink, notice::ModerationNotice};

#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
    tracker: TaskTracker,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("timeout", &self.timeout)
            .field("in_flight", &self.tracker.len())
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        Self {
            sink,
            timeout,
            tracker: TaskTracker::new(),
        }
    }

    /// Deliveries spawned and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Queue `notice` for delivery on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, notice: ModerationNotice) {
        let sink = self.sink.clone();
        let timeout = self.timeout;

        tracing::debug!(
            target_user_id = notice.target_user_id,
            kind = notice.kind.as_str(),
            "dispatching notice"
        );

        self.tracker.spawn(async move {
            match tokio::time::timeout(timeout, sink.deliver(&notice)).await {
                Ok(Ok(())) => tracing::info!(
                    target_user_id = notice.target_user_id,
                    kind = notice.kind.as_str(),
                    "notice delivered"
                ),
                Ok(Err(e)) => tracing::warn!(
                    target_user_id = notice.target_user_id,
                    kind = notice.kind.as_str(),
                    error = %e,
                    "notice delivery failed"
                ),
                Err(_) => tracing::warn!(
                    target_user_id = notice.target_user_id,
                    kind = notice.kind.as_str(),
                    timeout_ms = timeout.as_millis() as u64,
                    "notice delivery timed out"
                ),
            }
        });
    }

    /// Wait for in-flight deliveries; called once on shutdown.
    ///
    /// Each delivery is bounded by the dispatcher timeout, so this terminates.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
