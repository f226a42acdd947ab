//! Report lifecycle controller.
//!
//! Owns the widget state and the embed configuration derived from it. All
//! mutation goes through [`ReportController::dispatch`], which is
//! synchronous and never fails: invalid actions are logged and dropped.

use super::action::{FilterSpec, ReportError, WidgetAction};
use super::config::ReportEmbedConfig;
use super::history::{StateHistory, StateTransition};
use super::state::WidgetState;
use super::transition::{transition, Dispatch};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Transitions a controller keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Which UI controls are enabled for a given state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub embed_enabled: bool,
    pub filter_enabled: bool,
    pub retry_enabled: bool,
}

impl Controls {
    pub fn for_state(state: WidgetState) -> Self {
        Self {
            embed_enabled: state == WidgetState::Idle,
            filter_enabled: state.accepts_filters(),
            retry_enabled: state.is_error(),
        }
    }
}

/// Read-only copy of everything the UI layer may render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub state: WidgetState,
    pub config: ReportEmbedConfig,
    /// Bumped every time new credentials are written into `config`.
    pub config_revision: u64,
    pub applied_filters: Vec<FilterSpec>,
    pub last_error: Option<ReportError>,
}

impl WidgetSnapshot {
    pub fn controls(&self) -> Controls {
        Controls::for_state(self.state)
    }
}

/// The widget state machine.
///
/// # Example
///
/// ```rust
/// use report_widget::core::{EmbedCredentials, ReportController, WidgetAction, WidgetState};
///
/// let mut controller = ReportController::new();
/// controller.dispatch(WidgetAction::SetConfig(EmbedCredentials::new("u", "t")));
///
/// assert_eq!(controller.current_state(), WidgetState::Loading);
/// assert_eq!(controller.current_config().embed_url.as_deref(), Some("u"));
/// assert_eq!(controller.current_config().access_token.as_deref(), Some("t"));
/// ```
#[derive(Clone, Debug)]
pub struct ReportController {
    state: WidgetState,
    config: ReportEmbedConfig,
    config_revision: u64,
    applied_filters: Vec<FilterSpec>,
    last_error: Option<ReportError>,
    history: StateHistory,
}

impl Default for ReportController {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ReportController {
    /// Create a controller in `idle` with the default embed configuration.
    ///
    /// History keeps the last [`DEFAULT_HISTORY_LIMIT`] transitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`ReportController::new`], keeping at most `limit` transitions.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            state: WidgetState::default(),
            config: ReportEmbedConfig::default(),
            config_revision: 0,
            applied_filters: Vec::new(),
            last_error: None,
            history: StateHistory::with_limit(limit),
        }
    }

    /// Apply one action.
    ///
    /// Accepted actions update the state and their side data; rejected ones
    /// change nothing.
    pub fn dispatch(&mut self, action: WidgetAction) -> Dispatch {
        let from = self.state;
        let kind = action.kind();

        let to = match transition(from, &action) {
            Ok(to) => to,
            Err(rejection) => {
                tracing::warn!(
                    action = %kind,
                    state = %from,
                    requires = rejection.requires,
                    "Rejected widget action"
                );
                return Dispatch::Rejected(rejection);
            }
        };

        match action {
            WidgetAction::SetConfig(credentials) => {
                self.config.apply_credentials(&credentials);
                self.config_revision += 1;
            }
            WidgetAction::ApplyFilters(filters) => {
                self.applied_filters = filters;
            }
            WidgetAction::ReportError(error) => {
                tracing::info!(error = %error, "Embedded report failed");
                self.last_error = Some(error);
            }
            WidgetAction::Retry => {
                self.last_error = None;
            }
            WidgetAction::ReportLoaded | WidgetAction::ReportRendered => {}
        }

        self.state = to;
        self.history = std::mem::take(&mut self.history).record(StateTransition {
            from,
            to,
            action: kind,
            timestamp: Utc::now(),
        });

        tracing::debug!(action = %kind, %from, %to, "Widget transition");
        Dispatch::Transitioned {
            from,
            to,
            action: kind,
        }
    }

    pub fn current_state(&self) -> WidgetState {
        self.state
    }

    pub fn current_config(&self) -> &ReportEmbedConfig {
        &self.config
    }

    pub fn config_revision(&self) -> u64 {
        self.config_revision
    }

    /// Filters from the last accepted `ApplyFilters`. Informational only.
    pub fn applied_filters(&self) -> &[FilterSpec] {
        &self.applied_filters
    }

    /// Error from the last `ReportError`, cleared by an accepted `Retry`.
    pub fn last_error(&self) -> Option<&ReportError> {
        self.last_error.as_ref()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            state: self.state,
            config: self.config.clone(),
            config_revision: self.config_revision,
            applied_filters: self.applied_filters.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
