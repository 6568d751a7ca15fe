//! Fake hosts and services for unit tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use transfers_api::{JobId, PeerCatalog, ResourceLevel, SendResponse, TransferRequest};
use transfers_client::{JobEngine, PeerRegistry, ResponseError, URI_PEERS, URI_SEND};

use crate::binder::{EntryPoint, Trigger};
use crate::catalog::PeerCatalogClient;
use crate::dialog::{CloseDetection, DialogHandle, DialogView, PeerSelectionDialog};
use crate::host::{DialogPresenter, DialogSurface, Navigator, Notifier, RecordContext, TriggerHost};
use crate::submitter::TransferJobSubmitter;
use crate::tracing_subscriber::{ConsoleLevel, HostConsole};
use crate::workflow::TransferWorkflow;

pub(crate) fn catalog() -> PeerCatalog {
    serde_json::from_value(serde_json::json!({
        "A": "installed",
        "B": "other",
        "C": "bidirectional",
        "D": "disabled"
    }))
    .unwrap()
}

pub(crate) fn unavailable() -> ResponseError {
    ResponseError::Status {
        uri: URI_PEERS.to_string(),
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: String::new(),
    }
}

pub(crate) fn rejected() -> ResponseError {
    ResponseError::Status {
        uri: URI_SEND.to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "{\"Message\": \"Unknown peer\"}".to_string(),
    }
}

type Respond<T> = Box<dyn Fn() -> Result<T, ResponseError> + Send + Sync>;

pub(crate) struct FakeRegistry {
    respond: Option<Respond<PeerCatalog>>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    pub fn answering(catalog: PeerCatalog) -> Self {
        Self::with(Some(Box::new(move || Ok(catalog.clone()))))
    }

    pub fn failing(error: fn() -> ResponseError) -> Self {
        Self::with(Some(Box::new(move || Err(error()))))
    }

    /// Never responds.
    pub fn stalled() -> Self {
        Self::with(None)
    }

    fn with(respond: Option<Respond<PeerCatalog>>) -> Self {
        Self {
            respond,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerRegistry for FakeRegistry {
    async fn fetch_peers(&self) -> Result<PeerCatalog, ResponseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.respond {
            Some(respond) => respond(),
            None => std::future::pending().await,
        }
    }
}

pub(crate) struct FakeEngine {
    respond: Option<Respond<SendResponse>>,
    requests: Mutex<Vec<serde_json::Value>>,
}

impl FakeEngine {
    pub fn answering(body: serde_json::Value) -> Self {
        let response: SendResponse = serde_json::from_value(body).unwrap();
        Self::with(Some(Box::new(move || Ok(response.clone()))))
    }

    pub fn failing(error: fn() -> ResponseError) -> Self {
        Self::with(Some(Box::new(move || Err(error()))))
    }

    /// Never responds.
    pub fn stalled() -> Self {
        Self::with(None)
    }

    fn with(respond: Option<Respond<SendResponse>>) -> Self {
        Self {
            respond,
            requests: Default::default(),
        }
    }

    /// Bodies of the submitted requests.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobEngine for FakeEngine {
    async fn submit(&self, request: &TransferRequest) -> Result<SendResponse, ResponseError> {
        let body = serde_json::to_value(request).unwrap();
        self.requests.lock().unwrap().push(body);
        match &self.respond {
            Some(respond) => respond(),
            None => std::future::pending().await,
        }
    }
}

/// Something the user or the host does to an open dialog.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DialogAction {
    /// Click the entry of a peer.
    Activate(&'static str),
    /// Close the dialog without choosing.
    Dismiss,
    /// The dialog is torn down and reported through the handle.
    Close,
    /// The dialog is torn down without telling the handle.
    Hide,
    /// The host drops its handle without reporting anything.
    Abandon,
}

/// Presents dialogs by replaying the same actions on each of them.
pub(crate) struct ScriptedPresenter {
    actions: Vec<DialogAction>,
    visible: Arc<AtomicBool>,
    handles: Mutex<Vec<DialogHandle>>,
    views: Mutex<Vec<DialogView>>,
    opened: Notify,
}

struct FakeSurface(Arc<AtomicBool>);

impl DialogSurface for FakeSurface {
    fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl ScriptedPresenter {
    pub fn new(actions: Vec<DialogAction>) -> Self {
        Self {
            actions,
            visible: Arc::new(AtomicBool::new(true)),
            handles: Mutex::new(Vec::new()),
            views: Mutex::new(Vec::new()),
            opened: Notify::new(),
        }
    }

    /// Number of dialogs opened.
    pub fn opened(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    /// Remove the dialog from the screen.
    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    /// Handle of the last opened dialog.
    pub async fn wait_for_handle(&self) -> DialogHandle {
        loop {
            if let Some(handle) = self.handles.lock().unwrap().last().cloned() {
                return handle;
            }
            self.opened.notified().await;
        }
    }
}

#[async_trait]
impl DialogPresenter for ScriptedPresenter {
    async fn open(&self, view: DialogView, handle: DialogHandle) -> Box<dyn DialogSurface> {
        self.views.lock().unwrap().push(view);
        let mut keep = true;
        for action in &self.actions {
            match action {
                DialogAction::Activate(name) => {
                    handle.activate(name);
                }
                DialogAction::Dismiss => handle.dismiss(),
                DialogAction::Close => handle.closed(),
                DialogAction::Hide => self.hide(),
                DialogAction::Abandon => keep = false,
            }
        }
        if keep {
            self.handles.lock().unwrap().push(handle);
            self.opened.notify_one();
        }
        Box::new(FakeSurface(self.visible.clone()))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator(Mutex<Vec<JobId>>);

impl RecordingNavigator {
    pub fn jobs(&self) -> Vec<JobId> {
        self.0.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.jobs().iter().map(JobId::view_route).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn open_job(&self, job: &JobId) {
        self.0.lock().unwrap().push(job.clone());
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub(crate) struct SwitchableRecord(Mutex<Option<String>>);

impl SwitchableRecord {
    pub fn show(&self, id: &str) {
        self.0.lock().unwrap().replace(id.to_string());
    }
}

impl RecordContext for SwitchableRecord {
    fn current_resource(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub(crate) struct RecordingTriggerHost(Mutex<Vec<(EntryPoint, String, Trigger)>>);

impl RecordingTriggerHost {
    pub fn attached(&self) -> Vec<(EntryPoint, String, Trigger)> {
        self.0.lock().unwrap().clone()
    }

    pub fn trigger(&self, level: ResourceLevel) -> Trigger {
        self.attached()
            .into_iter()
            .find(|(_, _, trigger)| trigger.level() == level)
            .map(|(_, _, trigger)| trigger)
            .unwrap()
    }
}

impl TriggerHost for RecordingTriggerHost {
    fn attach(&self, entry: &EntryPoint, label: &str, trigger: Trigger) {
        self.0
            .lock()
            .unwrap()
            .push((*entry, label.to_string(), trigger));
    }
}

#[derive(Default)]
pub(crate) struct RecordingConsole(Mutex<Vec<(ConsoleLevel, String)>>);

impl RecordingConsole {
    pub fn messages(&self) -> Vec<(ConsoleLevel, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl HostConsole for RecordingConsole {
    fn log(&self, level: ConsoleLevel, _plugin: &str, message: &str) {
        self.0.lock().unwrap().push((level, message.to_string()));
    }
}

/// Fakes for every collaborator of a [TransferWorkflow].
pub(crate) struct Fixture {
    pub registry: Arc<FakeRegistry>,
    pub presenter: Arc<ScriptedPresenter>,
    pub engine: Arc<FakeEngine>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Fixture {
    pub fn new(registry: FakeRegistry, actions: Vec<DialogAction>, engine: FakeEngine) -> Self {
        Self {
            registry: Arc::new(registry),
            presenter: Arc::new(ScriptedPresenter::new(actions)),
            engine: Arc::new(engine),
            navigator: Default::default(),
            notifier: Default::default(),
        }
    }

    pub fn workflow(&self) -> TransferWorkflow {
        TransferWorkflow::new(
            PeerCatalogClient::new(self.registry.clone(), Duration::from_secs(10)),
            PeerSelectionDialog::new(self.presenter.clone(), CloseDetection::Event),
            TransferJobSubmitter::new(self.engine.clone(), Duration::from_secs(60)),
            self.navigator.clone(),
            self.notifier.clone(),
        )
    }
}
