//! State transition history tracking.
//!
//! Only accepted transitions are recorded; rejected actions leave no trace.
//! A history may be bounded, in which case the oldest entries are dropped.

use super::action::ActionKind;
use super::state::WidgetState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single accepted transition.
///
/// # Example
///
/// ```rust
/// use report_widget::core::{ActionKind, StateTransition, WidgetState};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: WidgetState::Idle,
///     to: WidgetState::Loading,
///     action: ActionKind::SetConfig,
///     timestamp: Utc::now(),
/// };
/// assert!(transition.changed_state());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: WidgetState,
    /// The state being transitioned to
    pub to: WidgetState,
    /// The action that caused it
    pub action: ActionKind,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    /// Whether the transition moved to a different state.
    ///
    /// `ApplyFilters` from `rendering` and repeated report events are
    /// accepted without changing state.
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered history of accepted transitions.
///
/// # Example
///
/// ```rust
/// use report_widget::core::{ActionKind, StateHistory, StateTransition, WidgetState};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: WidgetState::Idle,
///         to: WidgetState::Loading,
///         action: ActionKind::SetConfig,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: WidgetState::Loading,
///         to: WidgetState::Rendering,
///         action: ActionKind::ReportLoaded,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![WidgetState::Idle, WidgetState::Loading, WidgetState::Rendering]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl StateHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` transitions (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, returning the extended history.
    ///
    /// When bounded and full, the oldest transition is dropped.
    pub fn record(mut self, transition: StateTransition) -> Self {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
        self
    }

    /// Get the path of states traversed.
    ///
    /// The oldest retained transition's `from` state, then the `to` state of
    /// each transition. Empty if nothing was recorded.
    pub fn get_path(&self) -> Vec<WidgetState> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Calculate total duration from the oldest retained to the last
    /// transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
