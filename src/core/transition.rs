//! The widget's transition table.

use super::action::{ActionKind, WidgetAction};
use super::guard::Guard;
use super::state::WidgetState;

/// One row of the transition table: the guard an action must pass and the
/// state it leads to.
#[derive(Clone, Copy, Debug)]
pub struct TransitionRule {
    pub action: ActionKind,
    pub guard: Option<Guard>,
    pub to: WidgetState,
}

impl TransitionRule {
    /// Look up the rule for an action kind.
    ///
    /// Exhaustive over [`ActionKind`], so every action has exactly one rule.
    pub fn for_action(action: ActionKind) -> Self {
        let (guard, to) = match action {
            ActionKind::SetConfig => (Some(Guard::IDLE), WidgetState::Loading),
            ActionKind::ReportLoaded => (None, WidgetState::Rendering),
            ActionKind::ReportError => (None, WidgetState::Failed),
            ActionKind::ReportRendered => (None, WidgetState::Rendered),
            ActionKind::ApplyFilters => (Some(Guard::ACCEPTS_FILTERS), WidgetState::Rendering),
            ActionKind::Retry => (Some(Guard::FAILED), WidgetState::Idle),
        };
        Self { action, guard, to }
    }

    /// Check if this rule can fire from the current state (pure)
    pub fn can_execute(&self, current: &WidgetState) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(current))
    }
}

/// An action that is not valid for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {action} while {state}: requires {requires}")]
pub struct Rejection {
    pub action: ActionKind,
    pub state: WidgetState,
    pub requires: &'static str,
}

/// Outcome of one dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The action was accepted. `from` may equal `to`.
    Transitioned {
        from: WidgetState,
        to: WidgetState,
        action: ActionKind,
    },
    /// The action was invalid for the current state; nothing changed.
    Rejected(Rejection),
}

impl Dispatch {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// State after the dispatch.
    pub fn state(&self) -> WidgetState {
        match self {
            Self::Transitioned { to, .. } => *to,
            Self::Rejected(rejection) => rejection.state,
        }
    }
}

/// Compute the next state for an action (pure).
///
/// # Example
///
/// ```rust
/// use report_widget::core::{transition, WidgetAction, WidgetState};
///
/// assert_eq!(
///     transition(WidgetState::Failed, &WidgetAction::Retry),
///     Ok(WidgetState::Idle)
/// );
/// assert!(transition(WidgetState::Rendered, &WidgetAction::Retry).is_err());
/// ```
pub fn transition(current: WidgetState, action: &WidgetAction) -> Result<WidgetState, Rejection> {
    let rule = TransitionRule::for_action(action.kind());
    if rule.can_execute(&current) {
        Ok(rule.to)
    } else {
        Err(Rejection {
            action: rule.action,
            state: current,
            requires: rule.guard.map_or("", |g| g.requires()),
        })
    }
}
