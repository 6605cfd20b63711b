use tokio::task::JoinHandle;
use tracing::debug;

use crate::metrics::ACTIVE_SUBSCRIPTIONS;

/// Cancellation handle for a live feed query.
///
/// Delivery stops when `cancel` is called or the handle is dropped.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn spawned(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A subscription that never delivers, used while degraded
    pub(crate) fn inert() -> Self {
        Self { handle: None }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("feed subscription cancelled");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Keeps the active-subscription gauge in step with the delivery task,
/// including when the task is aborted
pub(crate) struct ActiveGuard;

impl ActiveGuard {
    pub(crate) fn enter() -> Self {
        ACTIVE_SUBSCRIPTIONS.inc();
        ActiveGuard
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE_SUBSCRIPTIONS.dec();
    }
}
