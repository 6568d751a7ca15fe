//! Send a patient, study or series to another Orthanc peer from Orthanc Explorer.
//!
//! A trigger is added to the page of every patient, study and series. When it
//! is activated, [TransferWorkflow] lists the peers of the transfers
//! accelerator, lets the user choose one in a [PeerSelectionDialog], creates
//! the transfer job, and opens the status page of the job.
//!
//! The browsing UI is abstracted by the traits of [host]. Call [extend_explorer]
//! once with the implementations of the UI.

mod binder;
mod catalog;
mod config;
mod dialog;
pub mod host;
mod submitter;
mod tracing_subscriber;
mod workflow;

#[cfg(test)]
mod testing;

pub use binder::{ENTRY_POINTS, EntryPoint, TRIGGER_LABEL, Trigger, UiEntryPointBinder};
pub use catalog::{CatalogUnavailable, PeerCatalogClient};
pub use config::{CloseDetectionMode, ConfigError, TransfersConfig};
pub use dialog::{
    CloseDetection, DIALOG_HEADER, DialogEntry, DialogHandle, DialogPhase, DialogView,
    MIN_POLL_INTERVAL, PeerSelectionDialog, Selection,
};
pub use submitter::{Submission, SubmissionFailed, TransferJobSubmitter};
pub use tracing_subscriber::{ConsoleLevel, HostConsole, HostLogger, install_logger};
pub use workflow::{
    CATALOG_UNAVAILABLE_MESSAGE, NO_JOB_MESSAGE, Notices, Outcome, SUBMISSION_FAILED_MESSAGE,
    TransferWorkflow,
};

use std::sync::Arc;
use transfers_client::{BaseClient, PeersClient, TransfersClient};

use crate::host::{DialogPresenter, Navigator, Notifier, RecordContext, TriggerHost};

/// Name of this extension in log messages.
pub const PLUGIN_NAME: &str = env!("CARGO_PKG_NAME");

/// Implementations of the browsing UI.
#[derive(Clone)]
pub struct ExplorerHost {
    pub presenter: Arc<dyn DialogPresenter>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub record: Arc<dyn RecordContext>,
    pub triggers: Arc<dyn TriggerHost>,
    pub console: Arc<dyn HostConsole>,
}

/// Install the logger, connect to Orthanc, and add the triggers to the UI.
pub fn extend_explorer(
    config: &TransfersConfig,
    host: ExplorerHost,
) -> Result<Arc<TransferWorkflow>, ConfigError> {
    install_logger(host.console.clone(), PLUGIN_NAME, config.verbose);
    let workflow = Arc::new(TransferWorkflow::from_config(
        config,
        host.presenter,
        host.navigator,
        host.notifier,
    )?);
    UiEntryPointBinder::new(Arc::clone(&workflow)).bind(host.triggers.as_ref(), host.record);
    tracing::info!(
        orthanc = config.url.as_str(),
        triggers = ENTRY_POINTS.len(),
        "Transfers accelerator added to Orthanc Explorer"
    );
    Ok(workflow)
}

impl TransferWorkflow {
    /// Create a workflow which calls the Orthanc at [TransfersConfig::url].
    pub fn from_config(
        config: &TransfersConfig,
        presenter: Arc<dyn DialogPresenter>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        let peers = BaseClient::with_timeout(config.url.clone(), config.catalog_timeout)?;
        let transfers = BaseClient::with_timeout(config.url.clone(), config.submit_timeout)?;
        let catalog = PeerCatalogClient::new(
            Arc::new(PeersClient::new(peers)),
            config.catalog_timeout,
        );
        let dialog = PeerSelectionDialog::new(presenter, config.close_detection());
        let submitter =
            TransferJobSubmitter::new(Arc::new(TransfersClient::new(transfers)), config.submit_timeout)
                .with_priority(config.priority);
        let notices = Notices {
            missing_job: config.notify_missing_job,
            catalog_failure: config.notify_catalog_failure,
        };
        Ok(Self::new(catalog, dialog, submitter, navigator, notifier).with_notices(notices))
    }
}
