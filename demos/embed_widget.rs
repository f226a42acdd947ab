//! Embed Widget
//!
//! This example drives one report widget through its whole lifecycle.
//!
//! Key concepts:
//! - Settings loaded from `report-widget.toml` and `REPORT_WIDGET__*` variables
//! - Embed credentials fetched from the configured endpoint
//! - A scripted report handle standing in for the embedding library
//! - Filter selection and retry after a report error
//!
//! Run with: cargo run --example embed_widget
//! Set `RUST_LOG=report_widget=debug` to see every transition.

use async_trait::async_trait;
use report_widget::coordinator::{
    EventCallback, EventName, HandleError, Page, ReportEvent, ReportHandle,
};
use report_widget::core::FilterSpec;
use report_widget::{EmbedCoordinator, Settings, WidgetStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Single page that prints the filters it receives.
struct ConsolePage;

#[async_trait]
impl Page for ConsolePage {
    fn name(&self) -> &str {
        "Overview"
    }

    async fn remove_filters(&self) -> Result<(), HandleError> {
        println!("  page '{}': filters cleared", self.name());
        Ok(())
    }

    async fn set_filters(&self, filters: Vec<FilterSpec>) -> Result<(), HandleError> {
        for filter in &filters {
            println!(
                "  page '{}': {}.{} in {:?}",
                self.name(),
                filter.target.table,
                filter.target.column,
                filter.values
            );
        }
        Ok(())
    }
}

/// Report handle whose events are fired by hand.
#[derive(Default)]
struct ScriptedReport {
    callbacks: Mutex<HashMap<EventName, EventCallback>>,
}

impl ScriptedReport {
    fn fire(&self, event: ReportEvent) {
        let callback = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.name)
            .cloned();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

#[async_trait]
impl ReportHandle for ScriptedReport {
    fn on(&self, event: EventName, callback: EventCallback) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event, callback);
    }

    fn off(&self, event: EventName) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&event);
    }

    async fn get_pages(&self) -> Result<Vec<Arc<dyn Page>>, HandleError> {
        Ok(vec![Arc::new(ConsolePage)])
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    println!("=== Report Widget ===\n");

    let settings = Settings::load()?;
    println!("Config endpoint: {}", settings.config_endpoint);

    let store = WidgetStore::new();
    let coordinator = EmbedCoordinator::from_settings(store, &settings)?;
    println!("Initial state: {}", coordinator.current_state());

    if coordinator.embed().await.is_none() {
        println!("Embed config unavailable; widget stays {}", coordinator.current_state());
        return Ok(());
    }
    println!("After embed: {}", coordinator.current_state());

    let report = Arc::new(ScriptedReport::default());
    coordinator.bind_embedded_object(report.clone());

    report.fire(ReportEvent::new(EventName::Loaded));
    println!("After loaded: {}", coordinator.current_state());
    report.fire(ReportEvent::new(EventName::Rendered));
    println!("After rendered: {}", coordinator.current_state());

    println!("\nSelecting segment 'Regular':");
    coordinator.set_filter_selection("Regular").await;
    report.fire(ReportEvent::new(EventName::Rendered));
    println!("After filtering: {}", coordinator.current_state());

    report.fire(ReportEvent::with_detail(
        EventName::Error,
        serde_json::json!({ "message": "TokenExpired" }),
    ));
    let snapshot = coordinator.store().snapshot();
    println!(
        "\nAfter error: {} ({})",
        snapshot.state,
        snapshot.last_error.map(|e| e.message).unwrap_or_default()
    );

    coordinator.retry();
    println!("After retry: {}", coordinator.current_state());

    println!("\nPath:");
    for state in coordinator.store().history().get_path() {
        println!("  {state}");
    }

    Ok(())
}
