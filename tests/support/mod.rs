//! In-memory stand-ins for the embedding library.

#![allow(dead_code)]

use async_trait::async_trait;
use report_widget::coordinator::{
    ConfigSource, CoordinatorError, CoordinatorOptions, EventCallback, EventName, HandleError,
    Page, ReportEvent, ReportHandle,
};
use report_widget::core::{EmbedCredentials, FilterSpec, WidgetState};
use report_widget::{EmbedCoordinator, WidgetStore};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

#[derive(Default)]
pub struct MockPage {
    name: String,
    fail_set_filters: bool,
    removals: AtomicUsize,
    applied: Mutex<Vec<Vec<FilterSpec>>>,
}

impl MockPage {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            ..Self::default()
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_set_filters: true,
            ..Self::default()
        })
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    pub fn applied(&self) -> Vec<Vec<FilterSpec>> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl Page for MockPage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn remove_filters(&self) -> Result<(), HandleError> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_filters(&self, filters: Vec<FilterSpec>) -> Result<(), HandleError> {
        if self.fail_set_filters {
            return Err(HandleError::new("setFilters rejected"));
        }
        self.applied.lock().unwrap().push(filters);
        Ok(())
    }
}

/// Report handle that records subscriptions and lets tests fire events.
pub struct MockReport {
    callbacks: Mutex<HashMap<EventName, EventCallback>>,
    off_calls: Mutex<Vec<EventName>>,
    pages: Result<Vec<Arc<MockPage>>, HandleError>,
    page_requests: AtomicUsize,
    page_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    page_started: Option<mpsc::UnboundedSender<usize>>,
}

impl MockReport {
    fn build(pages: Result<Vec<Arc<MockPage>>, HandleError>) -> Self {
        Self {
            callbacks: Mutex::new(HashMap::new()),
            off_calls: Mutex::new(Vec::new()),
            pages,
            page_requests: AtomicUsize::new(0),
            page_gates: Mutex::new(VecDeque::new()),
            page_started: None,
        }
    }

    pub fn with_pages(pages: Vec<Arc<MockPage>>) -> Arc<Self> {
        Arc::new(Self::build(Ok(pages)))
    }

    pub fn failing_pages(message: &str) -> Arc<Self> {
        Arc::new(Self::build(Err(HandleError::new(message))))
    }

    /// Report whose `get_pages` calls each wait on the next gate.
    ///
    /// The returned receiver yields the index of every call as it starts.
    pub fn gated(
        pages: Vec<Arc<MockPage>>,
        gates: Vec<oneshot::Receiver<()>>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<usize>) {
        let (started, started_rx) = mpsc::unbounded_channel();
        let report = Self {
            page_gates: Mutex::new(gates.into()),
            page_started: Some(started),
            ..Self::build(Ok(pages))
        };
        (Arc::new(report), started_rx)
    }

    /// Fire an event; returns whether a callback was registered.
    pub fn emit(&self, event: ReportEvent) -> bool {
        let callback = self.callbacks.lock().unwrap().get(&event.name).cloned();
        match callback {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }

    pub fn emit_name(&self, name: EventName) -> bool {
        self.emit(ReportEvent::new(name))
    }

    pub fn is_subscribed(&self, name: EventName) -> bool {
        self.callbacks.lock().unwrap().contains_key(&name)
    }

    pub fn off_calls(&self) -> Vec<EventName> {
        self.off_calls.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportHandle for MockReport {
    fn on(&self, event: EventName, callback: EventCallback) {
        self.callbacks.lock().unwrap().insert(event, callback);
    }

    fn off(&self, event: EventName) {
        self.callbacks.lock().unwrap().remove(&event);
        self.off_calls.lock().unwrap().push(event);
    }

    async fn get_pages(&self) -> Result<Vec<Arc<dyn Page>>, HandleError> {
        let index = self.page_requests.fetch_add(1, Ordering::SeqCst);
        let gate = self.page_gates.lock().unwrap().pop_front();
        if let Some(started) = &self.page_started {
            let _ = started.send(index);
        }
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| HandleError::new("page gate dropped"))?;
        }
        match &self.pages {
            Ok(pages) => Ok(pages
                .iter()
                .map(|page| Arc::clone(page) as Arc<dyn Page>)
                .collect()),
            Err(err) => Err(err.clone()),
        }
    }
}

/// Config source that always succeeds with fixed credentials.
pub struct StaticSource;

pub const STATIC_EMBED_URL: &str = "https://embed.test/reportEmbed?reportId=sample";
pub const STATIC_TOKEN: &str = "static-token";

#[async_trait]
impl ConfigSource for StaticSource {
    async fn fetch(&self) -> Result<EmbedCredentials, CoordinatorError> {
        Ok(EmbedCredentials::new(STATIC_EMBED_URL, STATIC_TOKEN))
    }
}

/// Config source whose fetches complete only when the test releases them.
///
/// Each fetch takes the next gate in order and reports its index on
/// `started` before waiting.
pub struct GatedSource {
    gates: Mutex<VecDeque<oneshot::Receiver<EmbedCredentials>>>,
    started: mpsc::UnboundedSender<usize>,
    next: AtomicUsize,
}

impl GatedSource {
    pub fn new(
        gates: Vec<oneshot::Receiver<EmbedCredentials>>,
    ) -> (Self, mpsc::UnboundedReceiver<usize>) {
        let (started, started_rx) = mpsc::unbounded_channel();
        let source = Self {
            gates: Mutex::new(gates.into()),
            started,
            next: AtomicUsize::new(0),
        };
        (source, started_rx)
    }
}

#[async_trait]
impl ConfigSource for GatedSource {
    async fn fetch(&self) -> Result<EmbedCredentials, CoordinatorError> {
        let gate = self.gates.lock().unwrap().pop_front();
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.send(index);
        match gate {
            Some(gate) => gate
                .await
                .map_err(|_| CoordinatorError::Decode("gate dropped".to_string())),
            None => Err(CoordinatorError::Decode("no gate left".to_string())),
        }
    }
}

/// Coordinator over [`StaticSource`] driven into `rendered` with `report`
/// bound.
pub async fn rendered_coordinator(report: &Arc<MockReport>) -> EmbedCoordinator<StaticSource> {
    rendered_coordinator_with(report, CoordinatorOptions::default()).await
}

pub async fn rendered_coordinator_with(
    report: &Arc<MockReport>,
    options: CoordinatorOptions,
) -> EmbedCoordinator<StaticSource> {
    let coordinator = EmbedCoordinator::new(WidgetStore::new(), StaticSource, options);
    coordinator.embed().await;
    let handle: Arc<dyn ReportHandle> = report.clone();
    assert!(coordinator.bind_embedded_object(handle));
    report.emit_name(EventName::Loaded);
    report.emit_name(EventName::Rendered);
    assert_eq!(coordinator.current_state(), WidgetState::Rendered);
    coordinator
}
