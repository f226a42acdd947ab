//! Pure core of the widget: state, actions, the transition table and the
//! controller that applies it.
//!
//! Nothing in this module performs I/O. Network calls and the embedded
//! report object live in [`crate::coordinator`].

mod action;
mod config;
mod controller;
mod guard;
mod history;
mod state;
mod transition;
mod wire;

pub use action::{
    ActionKind, EmbedCredentials, FilterOperator, FilterSpec, FilterTarget, FilterType,
    ReportError, WidgetAction, BASIC_FILTER_SCHEMA,
};
pub use config::{
    BackgroundType, CustomLayout, DisplayOption, DisplaySettings, EmbedType, FiltersPane,
    LayoutType, PageNavigationPane, Panes, ReportEmbedConfig, TokenType,
};
pub use controller::{Controls, ReportController, WidgetSnapshot, DEFAULT_HISTORY_LIMIT};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::WidgetState;
pub use transition::{transition, Dispatch, Rejection, TransitionRule};
