//! Report widget: lifecycle control for an externally embedded report.
//!
//! The crate follows a "pure core, imperative shell" split:
//!
//! - [`core`] holds the widget state machine. [`core::ReportController`]
//!   applies a fixed transition table to [`core::WidgetAction`]s and owns
//!   the embed configuration derived from them. It performs no I/O.
//! - [`coordinator`] is the shell. [`coordinator::EmbedCoordinator`]
//!   fetches embed credentials over HTTP, forwards the embedded report's
//!   `loaded`/`rendered`/`error` events and applies filter selections,
//!   turning each outcome into an action.
//! - [`WidgetStore`] is the shared handle both sides use. The coordinator is
//!   its only writer; any number of readers may clone it.
//!
//! # Example
//!
//! ```rust
//! use report_widget::core::{EmbedCredentials, ReportError, WidgetAction, WidgetState};
//! use report_widget::ReportController;
//!
//! let mut controller = ReportController::new();
//!
//! controller.dispatch(WidgetAction::SetConfig(EmbedCredentials::new("https://embed", "token")));
//! controller.dispatch(WidgetAction::ReportLoaded);
//! controller.dispatch(WidgetAction::ReportError(ReportError::new("token expired")));
//! assert_eq!(controller.current_state(), WidgetState::Failed);
//!
//! controller.dispatch(WidgetAction::Retry);
//! assert_eq!(controller.current_state(), WidgetState::Idle);
//! ```

pub mod coordinator;
pub mod core;
pub mod settings;
mod store;

// Re-export commonly used types
pub use crate::coordinator::{EmbedCoordinator, ReportHandle};
pub use crate::core::{ReportController, WidgetAction, WidgetState};
pub use crate::settings::Settings;
pub use crate::store::WidgetStore;
