//! Interfaces to the record-browsing UI which hosts the transfers workflow.

use async_trait::async_trait;
use transfers_api::JobId;

use crate::binder::{EntryPoint, Trigger};
use crate::dialog::{DialogHandle, DialogView};

/// Renders the peer selection dialog.
#[async_trait]
pub trait DialogPresenter: Send + Sync {
    /// Show a modal dialog.
    ///
    /// The host must forward the user's actions to `handle`:
    /// [DialogHandle::activate] when an entry is clicked,
    /// [DialogHandle::dismiss] when the dialog is closed without choosing,
    /// and [DialogHandle::closed] once the dialog is torn down.
    async fn open(&self, view: DialogView, handle: DialogHandle) -> Box<dyn DialogSurface>;
}

/// A dialog rendered by the host.
pub trait DialogSurface: Send + Sync {
    /// Whether the dialog is still on screen.
    fn is_visible(&self) -> bool;
}

/// Opens the job-status view.
pub trait Navigator: Send + Sync {
    /// Show the status of a job, e.g. by changing the page to [JobId::view_route].
    fn open_job(&self, job: &JobId);
}

/// Shows messages to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a message and wait for the user to acknowledge it.
    async fn alert(&self, message: &str);
}

/// The record currently displayed by the host.
pub trait RecordContext: Send + Sync {
    /// Orthanc ID of the displayed patient, study or series.
    fn current_resource(&self) -> Option<String>;
}

/// Place where the host shows trigger controls.
pub trait TriggerHost: Send + Sync {
    /// Add a control labelled `label` next to the anchor of `entry`, which
    /// calls [Trigger::activate] when clicked.
    fn attach(&self, entry: &EntryPoint, label: &str, trigger: Trigger);
}
