//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over the current state. Each carries
//! a short description of what it requires, used when a transition is
//! rejected.

use super::state::WidgetState;
use std::fmt;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use report_widget::core::{Guard, WidgetState};
///
/// assert!(Guard::IDLE.check(&WidgetState::Idle));
/// assert!(!Guard::IDLE.check(&WidgetState::Loading));
/// assert!(Guard::ACCEPTS_FILTERS.check(&WidgetState::Rendered));
/// ```
#[derive(Clone, Copy)]
pub struct Guard {
    predicate: fn(&WidgetState) -> bool,
    requires: &'static str,
}

impl Guard {
    /// Only from `idle`.
    pub const IDLE: Guard = Guard::new(is_idle, "idle state");

    /// Only while the report is drawing or drawn.
    pub const ACCEPTS_FILTERS: Guard = Guard::new(
        WidgetState::accepts_filters,
        "rendering or rendered state",
    );

    /// Only from `failed`.
    pub const FAILED: Guard = Guard::new(WidgetState::is_error, "failed state");

    /// Create a guard from a pure predicate and a description of what it
    /// requires.
    pub const fn new(predicate: fn(&WidgetState) -> bool, requires: &'static str) -> Self {
        Guard {
            predicate,
            requires,
        }
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &WidgetState) -> bool {
        (self.predicate)(state)
    }

    /// What the guard requires, for diagnostics.
    pub fn requires(&self) -> &'static str {
        self.requires
    }
}

fn is_idle(state: &WidgetState) -> bool {
    matches!(state, WidgetState::Idle)
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("requires", &self.requires)
            .finish()
    }
}
