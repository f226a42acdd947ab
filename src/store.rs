//! Shared handle to one widget's controller.
//!
//! One crate-private writer path (`dispatch`) and any number of readers. Readers either
//! poll (`state`, `config`, `snapshot`) or subscribe to a `watch` channel
//! that is updated after every accepted transition.

use crate::core::{
    Dispatch, ReportController, ReportEmbedConfig, StateHistory, WidgetAction, WidgetSnapshot,
    WidgetState,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use uuid::Uuid;

struct Inner {
    instance_id: Uuid,
    controller: Mutex<ReportController>,
    snapshots: watch::Sender<WidgetSnapshot>,
}

/// Cloneable, thread-safe owner of a [`ReportController`].
///
/// The lock is held only for the duration of a single dispatch or read and
/// never across an await point.
///
/// # Example
///
/// Readers get clones; writes go through
/// [`EmbedCoordinator`](crate::EmbedCoordinator).
///
/// ```rust
/// use report_widget::core::{EmbedCredentials, WidgetAction, WidgetState};
/// use report_widget::{ReportController, WidgetStore};
///
/// let mut controller = ReportController::new();
/// controller.dispatch(WidgetAction::SetConfig(EmbedCredentials::new("u", "t")));
///
/// let store = WidgetStore::with_controller(controller);
/// let reader = store.clone();
///
/// assert_eq!(reader.state(), WidgetState::Loading);
/// assert_eq!(store.subscribe().borrow().state, WidgetState::Loading);
/// ```
#[derive(Clone)]
pub struct WidgetStore {
    inner: Arc<Inner>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::with_controller(ReportController::new())
    }

    pub fn with_controller(controller: ReportController) -> Self {
        let (snapshots, _) = watch::channel(controller.snapshot());
        Self {
            inner: Arc::new(Inner {
                instance_id: Uuid::new_v4(),
                controller: Mutex::new(controller),
                snapshots,
            }),
        }
    }

    /// Unique id of this widget instance, attached to log spans.
    pub fn instance_id(&self) -> Uuid {
        self.inner.instance_id
    }

    /// Apply an action and publish the new snapshot if it was accepted.
    ///
    /// Crate-private: the coordinator is the only writer, so it can keep the
    /// bound report handle in step with the state.
    pub(crate) fn dispatch(&self, action: WidgetAction) -> Dispatch {
        let mut controller = self.lock();
        let dispatch = controller.dispatch(action);
        if dispatch.is_accepted() {
            self.inner.snapshots.send_replace(controller.snapshot());
        }
        dispatch
    }

    pub fn state(&self) -> WidgetState {
        self.lock().current_state()
    }

    pub fn config(&self) -> ReportEmbedConfig {
        self.lock().current_config().clone()
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        self.lock().snapshot()
    }

    pub fn history(&self) -> StateHistory {
        self.lock().history().clone()
    }

    /// Receiver that observes every accepted transition.
    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.inner.snapshots.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, ReportController> {
        self.inner
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetStore")
            .field("instance_id", &self.inner.instance_id)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EmbedCredentials, ReportError};

    #[test]
    fn clones_share_one_controller() {
        let store = WidgetStore::new();
        let reader = store.clone();

        store.dispatch(WidgetAction::SetConfig(EmbedCredentials::new("u", "t")));

        assert_eq!(reader.state(), WidgetState::Loading);
        assert_eq!(reader.config().embed_url.as_deref(), Some("u"));
        assert_eq!(reader.instance_id(), store.instance_id());
    }

    #[test]
    fn rejected_actions_do_not_notify_subscribers() {
        let store = WidgetStore::new();
        let updates = store.subscribe();

        store.dispatch(WidgetAction::Retry);

        assert!(!updates.has_changed().unwrap());
        assert_eq!(store.state(), WidgetState::Idle);
    }

    #[test]
    fn subscribers_see_latest_snapshot() {
        let store = WidgetStore::new();
        let mut updates = store.subscribe();

        store.dispatch(WidgetAction::SetConfig(EmbedCredentials::new("u", "t")));
        store.dispatch(WidgetAction::ReportError(ReportError::new("boom")));

        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot.state, WidgetState::Failed);
        assert_eq!(snapshot.config_revision, 1);
        assert!(snapshot.controls().retry_enabled);
        assert_eq!(store.history().len(), 2);
    }
}
