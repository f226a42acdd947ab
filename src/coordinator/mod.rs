//! Effectful shell around the controller.
//!
//! The coordinator fetches embed credentials, listens to the embedded
//! report's lifecycle events and applies filter selections, turning each
//! outcome into a [`WidgetAction`](crate::core::WidgetAction).
//!
//! # Failure handling
//!
//! Every external call is isolated: a failed fetch, page lookup or filter
//! call is logged and abandons the operation without touching widget
//! state. Only the embedded report's own `error` event moves the widget to
//! `failed`.

mod embed;
mod error;
mod handle;
mod source;

pub use embed::{check_filter_preconditions, CoordinatorOptions, EmbedCoordinator, FilterPrecondition};
pub use error::CoordinatorError;
pub use handle::{
    EventCallback, EventName, EventSubscription, HandleError, Page, ReportEvent, ReportHandle,
};
pub use source::{parse_embed_config, ConfigSource, HttpConfigSource, SAMPLE_REPORT_URL};
