//! Interfaces of the live embedded report produced by the embedding library.
//!
//! The library itself is external; these traits describe only what the
//! coordinator calls on it.

use crate::core::FilterSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Events the coordinator subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Loaded,
    Rendered,
    Error,
}

impl EventName {
    pub const ALL: [EventName; 3] = [Self::Loaded, Self::Rendered, Self::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Rendered => "rendered",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event emitted by the embedded report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub name: EventName,
    /// Library-specific payload; `Null` when there is none.
    pub detail: serde_json::Value,
}

impl ReportEvent {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            detail: serde_json::Value::Null,
        }
    }

    pub fn with_detail(name: EventName, detail: serde_json::Value) -> Self {
        Self { name, detail }
    }
}

/// Callback registered for one event name.
pub type EventCallback = Arc<dyn Fn(ReportEvent) + Send + Sync>;

/// Failure reported by the embedded report or one of its pages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandleError(pub String);

impl HandleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A page of the embedded report.
#[async_trait]
pub trait Page: Send + Sync {
    fn name(&self) -> &str;

    /// Clear every filter currently set on the page.
    async fn remove_filters(&self) -> Result<(), HandleError>;

    /// Replace the page's filters.
    async fn set_filters(&self, filters: Vec<FilterSpec>) -> Result<(), HandleError>;
}

/// Live handle to an embedded report.
///
/// `on` replaces any callback already registered for the same event; `off`
/// removes it. Implementations must not hold internal locks while invoking
/// a callback, since callbacks may call `off` on the same handle.
#[async_trait]
pub trait ReportHandle: Send + Sync {
    fn on(&self, event: EventName, callback: EventCallback);

    fn off(&self, event: EventName);

    /// Pages of the report in display order.
    async fn get_pages(&self) -> Result<Vec<Arc<dyn Page>>, HandleError>;
}

/// Registration of one callback on a handle.
///
/// Dropping the subscription unregisters the callback. Unregistering an
/// event that already removed itself is harmless.
#[must_use = "dropping a subscription unregisters its callback"]
pub struct EventSubscription {
    handle: Arc<dyn ReportHandle>,
    event: EventName,
}

impl EventSubscription {
    /// Register `callback` for `event` on `handle`.
    pub fn register(handle: &Arc<dyn ReportHandle>, event: EventName, callback: EventCallback) -> Self {
        handle.on(event, callback);
        Self {
            handle: Arc::clone(handle),
            event,
        }
    }

    pub fn event(&self) -> EventName {
        self.event
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.handle.off(self.event);
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("event", &self.event)
            .finish()
    }
}
