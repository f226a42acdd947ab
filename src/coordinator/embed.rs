//! Embed coordinator: drives the controller from the outside world.

use super::error::CoordinatorError;
use super::handle::{EventCallback, EventName, EventSubscription, Page, ReportEvent, ReportHandle};
use super::source::{ConfigSource, HttpConfigSource};
use crate::core::{
    Dispatch, FilterSpec, FilterTarget, ReportEmbedConfig, ReportError, WidgetAction, WidgetState,
};
use crate::settings::{Settings, SettingsError};
use crate::store::WidgetStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Tunables of the coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Drop completions of an operation once a newer one of the same kind
    /// has started.
    pub discard_stale_completions: bool,
    /// Table and column the segment selector filters on.
    pub filter_target: FilterTarget,
}

/// Why a filter selection was not issued.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FilterPrecondition {
    #[error("state '{0}' does not accept filters")]
    WrongState(WidgetState),

    #[error("no embedded report is bound")]
    NoEmbeddedObject,
}

/// Check every precondition of a filter selection, collecting all failures.
pub fn check_filter_preconditions(
    state: WidgetState,
    has_embedded_object: bool,
) -> Validation<(), NonEmptyVec<FilterPrecondition>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<FilterPrecondition>>> = Vec::new();

    checks.push(if state.accepts_filters() {
        Validation::success(())
    } else {
        Validation::fail(FilterPrecondition::WrongState(state))
    });

    checks.push(if has_embedded_object {
        Validation::success(())
    } else {
        Validation::fail(FilterPrecondition::NoEmbeddedObject)
    });

    Validation::all_vec(checks).map(|_| ())
}

/// Monotonic counter identifying the newest operation of one kind.
#[derive(Debug, Default)]
struct Generation(AtomicU64);

impl Generation {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// A bound report handle together with its event subscriptions.
struct BoundReport {
    handle: Arc<dyn ReportHandle>,
    _subscriptions: Vec<EventSubscription>,
}

/// Connects the controller to the config endpoint and the embedded report.
///
/// Every external failure is logged and ends the operation; the controller
/// only ever sees well-formed actions.
pub struct EmbedCoordinator<C = HttpConfigSource> {
    store: WidgetStore,
    source: C,
    options: CoordinatorOptions,
    bound: Mutex<Option<BoundReport>>,
    embeds: Generation,
    selections: Generation,
}

impl EmbedCoordinator<HttpConfigSource> {
    /// Build a coordinator fetching from the configured HTTP endpoint.
    pub fn from_settings(store: WidgetStore, settings: &Settings) -> Result<Self, SettingsError> {
        settings.check()?;
        let source = HttpConfigSource::with_timeout(
            settings.config_endpoint.clone(),
            settings.request_timeout(),
        )?;
        Ok(Self::new(store, source, settings.coordinator_options()))
    }
}

impl<C: ConfigSource> EmbedCoordinator<C> {
    pub fn new(store: WidgetStore, source: C, options: CoordinatorOptions) -> Self {
        Self {
            store,
            source,
            options,
            bound: Mutex::new(None),
            embeds: Generation::default(),
            selections: Generation::default(),
        }
    }

    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    pub fn current_state(&self) -> WidgetState {
        self.store.state()
    }

    pub fn current_config(&self) -> ReportEmbedConfig {
        self.store.config()
    }

    /// Fetch embed credentials and hand them to the controller.
    ///
    /// Only issues the request while idle. Returns `None` when nothing was
    /// dispatched (not idle, fetch failed, or the completion was stale).
    #[tracing::instrument(skip(self), fields(instance = %self.store.instance_id()))]
    pub async fn embed(&self) -> Option<Dispatch> {
        let state = self.store.state();
        if state != WidgetState::Idle {
            tracing::debug!(%state, "Skipping embed: widget is not idle");
            return None;
        }

        let ticket = self.embeds.begin();
        let credentials = match self.source.fetch().await {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch config for report");
                return None;
            }
        };

        if self.options.discard_stale_completions && !self.embeds.is_current(ticket) {
            tracing::debug!(ticket, "Discarding stale embed config");
            return None;
        }

        Some(self.dispatch(WidgetAction::SetConfig(credentials)))
    }

    /// Attach the live report produced by the embedding surface.
    ///
    /// Subscribes to `loaded` (fires once), `rendered` and `error`. Any
    /// previously bound handle is released first. Ignored while idle, since
    /// no configuration exists to embed.
    pub fn bind_embedded_object(&self, handle: Arc<dyn ReportHandle>) -> bool {
        let state = self.store.state();
        if !state.holds_embedded_object() {
            tracing::warn!(%state, "Ignoring embedded report bound while idle");
            return false;
        }

        let mut bound = self.lock_bound();
        // Release first: the new handle may be the same object.
        drop(bound.take());
        let subscriptions = self.subscribe(&handle);
        *bound = Some(BoundReport {
            handle,
            _subscriptions: subscriptions,
        });

        tracing::debug!(%state, "Bound embedded report");
        true
    }

    /// Drop the bound handle and all of its subscriptions.
    pub fn release_embedded_object(&self) -> bool {
        let previous = self.lock_bound().take();
        let released = previous.is_some();
        drop(previous);
        if released {
            tracing::debug!("Released embedded report");
        }
        released
    }

    pub fn has_embedded_object(&self) -> bool {
        self.lock_bound().is_some()
    }

    /// Filter the report on one segment value.
    ///
    /// No-op unless the report is rendering or rendered and a handle is
    /// bound. `ApplyFilters` is dispatched before the filter is set on the
    /// first page; a failure while setting it is only logged.
    #[tracing::instrument(skip(self), fields(instance = %self.store.instance_id()))]
    pub async fn set_filter_selection(&self, segment: &str) -> Option<Dispatch> {
        let state = self.store.state();
        let handle = self
            .lock_bound()
            .as_ref()
            .map(|bound| Arc::clone(&bound.handle));

        if let Validation::Failure(reasons) = check_filter_preconditions(state, handle.is_some()) {
            let reasons: Vec<String> = reasons.iter().map(ToString::to_string).collect();
            tracing::debug!(?reasons, "Skipping filter selection");
            return None;
        }
        let handle = handle?;

        let ticket = self.selections.begin();
        let first_page = match handle.get_pages().await {
            Ok(pages) => match pages.into_iter().next() {
                Some(page) => page,
                None => {
                    let err = CoordinatorError::NoPages;
                    tracing::warn!(error = %err, "Cannot apply filters");
                    return None;
                }
            },
            Err(err) => {
                let err = CoordinatorError::Pages(err);
                tracing::error!(error = %err, "Cannot apply filters");
                return None;
            }
        };

        if self.options.discard_stale_completions && !self.selections.is_current(ticket) {
            tracing::debug!(ticket, "Discarding stale filter selection");
            return None;
        }

        let filters = vec![FilterSpec::segment(&self.options.filter_target, segment)];
        let dispatch = self.dispatch(WidgetAction::ApplyFilters(filters.clone()));
        if !dispatch.is_accepted() {
            return Some(dispatch);
        }

        if let Err(err) = apply_filters(first_page.as_ref(), filters).await {
            tracing::error!(error = %err, page = first_page.name(), "Failed to set filters");
        }
        Some(dispatch)
    }

    /// Ask the controller to leave `failed`.
    ///
    /// On success the widget is idle again and the old handle is released.
    pub fn retry(&self) -> Dispatch {
        self.dispatch(WidgetAction::Retry)
    }

    /// Dispatch to the store; a handle never outlives a return to idle.
    fn dispatch(&self, action: WidgetAction) -> Dispatch {
        let dispatch = self.store.dispatch(action);
        if let Dispatch::Transitioned {
            to: WidgetState::Idle,
            ..
        } = dispatch
        {
            self.release_embedded_object();
        }
        dispatch
    }

    fn subscribe(&self, handle: &Arc<dyn ReportHandle>) -> Vec<EventSubscription> {
        let loaded: EventCallback = {
            let store = self.store.clone();
            let weak = Arc::downgrade(handle);
            Arc::new(move |event: ReportEvent| {
                if let Some(handle) = weak.upgrade() {
                    handle.off(EventName::Loaded);
                }
                tracing::debug!(detail = %event.detail, "Report loaded");
                store.dispatch(WidgetAction::ReportLoaded);
            })
        };

        let rendered: EventCallback = {
            let store = self.store.clone();
            Arc::new(move |event: ReportEvent| {
                tracing::debug!(detail = %event.detail, "Report rendered");
                store.dispatch(WidgetAction::ReportRendered);
            })
        };

        let error: EventCallback = {
            let store = self.store.clone();
            Arc::new(move |event: ReportEvent| {
                let error = ReportError::from_event_detail(event.detail);
                store.dispatch(WidgetAction::ReportError(error));
            })
        };

        vec![
            EventSubscription::register(handle, EventName::Loaded, loaded),
            EventSubscription::register(handle, EventName::Rendered, rendered),
            EventSubscription::register(handle, EventName::Error, error),
        ]
    }

    fn lock_bound(&self) -> MutexGuard<'_, Option<BoundReport>> {
        self.bound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn apply_filters(page: &dyn Page, filters: Vec<FilterSpec>) -> Result<(), CoordinatorError> {
    page.remove_filters().await.map_err(CoordinatorError::Filters)?;
    page.set_filters(filters)
        .await
        .map_err(CoordinatorError::Filters)
}
