//! Modal choice of the peer which receives a transfer.
//!
//! The dialog goes through three phases:
//!
//! 1. [DialogPhase::Open]: entries are shown, only selectable peers can be clicked.
//! 2. [DialogPhase::PendingClose]: the user clicked a peer or closed the dialog.
//! 3. [DialogPhase::Closed]: the host has torn the dialog down.
//!
//! The choice is only read once the dialog is [DialogPhase::Closed], because the
//! host's close lifecycle is asynchronous relative to the click.

use compact_str::CompactString;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use transfers_api::{PeerCapability, PeerCatalog, SelectablePeer};

use crate::host::{DialogPresenter, DialogSurface};

/// Header of the peer selection dialog.
pub const DIALOG_HEADER: &str = "Choose Orthanc peer";

/// Shortest interval of [CloseDetection::Poll].
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Phase of a peer selection dialog.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DialogPhase {
    #[default]
    Open,
    PendingClose,
    Closed,
}

/// How [PeerSelectionDialog] learns that the host has torn the dialog down.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CloseDetection {
    /// Wait for [DialogHandle::closed].
    Event,
    /// Check [DialogSurface::is_visible] at this interval after the user closed the dialog.
    /// Intervals shorter than [MIN_POLL_INTERVAL] are raised to it.
    Poll(Duration),
}

/// Result of a peer selection.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Selection {
    Selected(SelectablePeer),
    Cancelled,
}

/// What the host should render.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub header: &'static str,
    pub entries: Vec<DialogEntry>,
}

/// A peer in the dialog. Entries which are not selectable are shown but inert.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogEntry {
    pub name: CompactString,
    pub capability: PeerCapability,
    pub selectable: bool,
}

impl DialogView {
    fn new(catalog: &PeerCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|(name, capability)| DialogEntry {
                name: CompactString::new(name),
                capability,
                selectable: capability.is_selectable(),
            })
            .collect();
        Self {
            header: DIALOG_HEADER,
            entries,
        }
    }
}

#[derive(Debug, Default)]
struct DialogState {
    phase: DialogPhase,
    selected: Option<SelectablePeer>,
}

/// The host's side of one open dialog.
///
/// Every dialog has its own handle, choices are never shared between dialogs.
#[derive(Clone)]
pub struct DialogHandle {
    catalog: Arc<PeerCatalog>,
    state: Arc<watch::Sender<DialogState>>,
}

impl DialogHandle {
    /// The user clicked the entry of a peer.
    ///
    /// Returns `false` and changes nothing if the peer is not selectable or the
    /// dialog is closed. Otherwise the peer replaces any previous choice and the
    /// dialog starts closing.
    pub fn activate(&self, name: &str) -> bool {
        let Some(peer) = self.catalog.selectable(name) else {
            tracing::debug!(peer = name, "ignoring click on peer which cannot be selected");
            return false;
        };
        self.state.send_if_modified(|state| {
            if state.phase == DialogPhase::Closed {
                return false;
            }
            state.selected = Some(peer);
            state.phase = DialogPhase::PendingClose;
            true
        })
    }

    /// The user closed the dialog without clicking a peer.
    pub fn dismiss(&self) {
        self.state.send_if_modified(|state| {
            if state.phase == DialogPhase::Open {
                state.phase = DialogPhase::PendingClose;
                true
            } else {
                false
            }
        });
    }

    /// The host has torn the dialog down.
    ///
    /// Dropping every clone of the handle has the same effect.
    pub fn closed(&self) {
        mark_closed(&self.state);
    }

    pub fn phase(&self) -> DialogPhase {
        self.state.borrow().phase
    }
}

/// Presents the peers of a [PeerCatalog] and waits for the user's choice.
#[derive(Clone)]
pub struct PeerSelectionDialog {
    presenter: Arc<dyn DialogPresenter>,
    detection: CloseDetection,
}

impl PeerSelectionDialog {
    pub fn new(presenter: Arc<dyn DialogPresenter>, detection: CloseDetection) -> Self {
        let detection = match detection {
            CloseDetection::Poll(interval) => CloseDetection::Poll(interval.max(MIN_POLL_INTERVAL)),
            event => event,
        };
        Self {
            presenter,
            detection,
        }
    }

    /// Show the dialog and wait until it is closed.
    pub async fn choose(&self, catalog: PeerCatalog) -> Selection {
        let view = DialogView::new(&catalog);
        let (sender, mut receiver) = watch::channel(DialogState::default());
        let state = Arc::new(sender);
        let closer = Arc::downgrade(&state);
        let handle = DialogHandle {
            catalog: Arc::new(catalog),
            state,
        };
        let surface = self.presenter.open(view, handle).await;

        wait_for_phase(&mut receiver, |phase| phase != DialogPhase::Open).await;
        match self.detection {
            CloseDetection::Event => {
                wait_for_phase(&mut receiver, |phase| phase == DialogPhase::Closed).await
            }
            CloseDetection::Poll(interval) => {
                poll_until_hidden(&closer, &mut receiver, surface.as_ref(), interval).await
            }
        }

        let selected = receiver.borrow().selected.clone();
        if let Some(peer) = selected {
            tracing::debug!(peer = peer.as_str(), "peer selected");
            Selection::Selected(peer)
        } else {
            tracing::debug!("peer selection cancelled");
            Selection::Cancelled
        }
    }
}

async fn wait_for_phase(
    receiver: &mut watch::Receiver<DialogState>,
    done: impl Fn(DialogPhase) -> bool,
) {
    loop {
        let phase = receiver.borrow_and_update().phase;
        if done(phase) {
            return;
        }
        if receiver.changed().await.is_err() {
            tracing::debug!("dialog handle dropped by the host");
            return;
        }
    }
}

fn mark_closed(state: &watch::Sender<DialogState>) {
    state.send_if_modified(|state| {
        if state.phase == DialogPhase::Closed {
            false
        } else {
            state.phase = DialogPhase::Closed;
            true
        }
    });
}

async fn poll_until_hidden(
    closer: &Weak<watch::Sender<DialogState>>,
    receiver: &mut watch::Receiver<DialogState>,
    surface: &dyn DialogSurface,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        let phase = receiver.borrow_and_update().phase;
        if phase == DialogPhase::Closed {
            return;
        }
        tokio::select! {
            _ = ticker.tick() => {
                if !surface.is_visible() {
                    if let Some(state) = closer.upgrade() {
                        mark_closed(&state);
                    }
                    return;
                }
            }
            changed = receiver.changed() => {
                if changed.is_err() {
                    tracing::debug!("dialog handle dropped by the host");
                    return;
                }
            }
        }
    }
}
