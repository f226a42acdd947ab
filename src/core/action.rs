//! Actions consumed by the controller and their payloads.

use super::wire::wire_enum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema tag the embedding library expects on basic filters.
pub const BASIC_FILTER_SCHEMA: &str = "http://powerbi.com/product/schema#basic";

/// Credentials returned by the embed-config endpoint.
///
/// Url and token always travel together; the controller never applies one
/// without the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedCredentials {
    pub embed_url: String,
    pub token: String,
    pub report_id: Option<String>,
}

impl EmbedCredentials {
    pub fn new(embed_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            embed_url: embed_url.into(),
            token: token.into(),
            report_id: None,
        }
    }

    pub fn with_report_id(mut self, report_id: impl Into<String>) -> Self {
        self.report_id = Some(report_id.into());
        self
    }
}

/// Error raised by the embedded report object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportError {
    pub message: String,
    /// Raw event payload, when the embedded object supplied one.
    pub detail: Option<serde_json::Value>,
}

impl ReportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    /// Build from an `error` event payload.
    ///
    /// Uses the payload's `message` field when present, otherwise a generic
    /// message. The full payload is kept as detail.
    pub fn from_event_detail(detail: serde_json::Value) -> Self {
        let message = detail
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("embedded report raised an error")
            .to_string();
        let detail = (!detail.is_null()).then_some(detail);
        Self { message, detail }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Table and column a filter applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTarget {
    pub table: String,
    pub column: String,
}

impl FilterTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl Default for FilterTarget {
    /// The product segment column of the sample report.
    fn default() -> Self {
        Self::new("Product", "Segment")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    In,
    NotIn,
    All,
}

wire_enum! {
    pub enum FilterType {
        Advanced = 0,
        Basic = 1,
    }
}

/// One filter to apply on a report page.
///
/// Opaque to the controller, which only records it.
///
/// # Example
///
/// ```rust
/// use report_widget::core::{FilterOperator, FilterSpec, FilterTarget};
///
/// let filter = FilterSpec::segment(&FilterTarget::default(), "Regular");
/// assert_eq!(filter.target.table, "Product");
/// assert_eq!(filter.target.column, "Segment");
/// assert_eq!(filter.operator, FilterOperator::In);
/// assert_eq!(filter.values, vec!["Regular".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub target: FilterTarget,
    pub operator: FilterOperator,
    pub values: Vec<String>,
    pub filter_type: FilterType,
}

impl FilterSpec {
    pub fn basic(target: FilterTarget, operator: FilterOperator, values: Vec<String>) -> Self {
        Self {
            schema: BASIC_FILTER_SCHEMA.to_string(),
            target,
            operator,
            values,
            filter_type: FilterType::Basic,
        }
    }

    /// Single-value `In` filter for a segment selection.
    pub fn segment(target: &FilterTarget, segment: impl Into<String>) -> Self {
        Self::basic(target.clone(), FilterOperator::In, vec![segment.into()])
    }
}

/// Input to the controller's transition function.
///
/// The set is closed: every variant is handled by an exhaustive match, so
/// there is no "unknown action" path at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetAction {
    SetConfig(EmbedCredentials),
    ReportLoaded,
    ReportRendered,
    ReportError(ReportError),
    ApplyFilters(Vec<FilterSpec>),
    Retry,
}

impl WidgetAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SetConfig(_) => ActionKind::SetConfig,
            Self::ReportLoaded => ActionKind::ReportLoaded,
            Self::ReportRendered => ActionKind::ReportRendered,
            Self::ReportError(_) => ActionKind::ReportError,
            Self::ApplyFilters(_) => ActionKind::ApplyFilters,
            Self::Retry => ActionKind::Retry,
        }
    }
}

/// Payload-free tag of a [`WidgetAction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SetConfig,
    ReportLoaded,
    ReportRendered,
    ReportError,
    ApplyFilters,
    Retry,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        Self::SetConfig,
        Self::ReportLoaded,
        Self::ReportRendered,
        Self::ReportError,
        Self::ApplyFilters,
        Self::Retry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetConfig => "SET_CONFIG",
            Self::ReportLoaded => "REPORT_LOADED",
            Self::ReportRendered => "REPORT_RENDERED",
            Self::ReportError => "REPORT_ERROR",
            Self::ApplyFilters => "APPLY_FILTERS",
            Self::Retry => "RETRY",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
