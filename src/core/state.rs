//! Lifecycle states of the embedded report widget.
//!
//! All methods are pure queries. The state value itself is only ever
//! replaced by the controller's transition function.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one embedded report.
///
/// # Example
///
/// ```rust
/// use report_widget::core::WidgetState;
///
/// let state = WidgetState::default();
/// assert_eq!(state, WidgetState::Idle);
/// assert!(!state.holds_embedded_object());
/// assert_eq!(state.to_string(), "idle");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    /// No configuration yet, nothing embedded.
    #[default]
    Idle,
    /// Configuration received, embedded object is being created.
    Loading,
    /// Report loaded and drawing its visuals.
    Rendering,
    /// All visuals drawn.
    Rendered,
    /// The embedded object raised an error.
    Failed,
}

impl WidgetState {
    /// Every state, in lifecycle order.
    pub const ALL: [WidgetState; 5] = [
        Self::Idle,
        Self::Loading,
        Self::Rendering,
        Self::Rendered,
        Self::Failed,
    ];

    /// Name used for display and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Rendering => "rendering",
            Self::Rendered => "rendered",
            Self::Failed => "failed",
        }
    }

    /// Check if this is the error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Whether an embedded report handle may be bound in this state.
    ///
    /// The handle is only meaningful once configuration has been accepted;
    /// it must be unset while idle.
    pub fn holds_embedded_object(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether filter changes can be applied in this state.
    pub fn accepts_filters(&self) -> bool {
        matches!(self, Self::Rendering | Self::Rendered)
    }
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
