use std::sync::Arc;
use transfers_api::{OrthancId, ResourceLevel};

use crate::host::{RecordContext, TriggerHost};
use crate::workflow::{Outcome, TransferWorkflow};

/// Label of the trigger controls.
pub const TRIGGER_LABEL: &str = "Transfers accelerator";

/// Where the trigger of a level goes in Orthanc Explorer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EntryPoint {
    pub level: ResourceLevel,
    /// Page which displays a resource of this level.
    pub page: &'static str,
    /// The trigger is inserted before this control of the page.
    pub anchor: &'static str,
}

/// Trigger locations for patients, studies and series.
pub const ENTRY_POINTS: [EntryPoint; 3] = [
    EntryPoint {
        level: ResourceLevel::Patient,
        page: "#patient",
        anchor: "#patient-delete",
    },
    EntryPoint {
        level: ResourceLevel::Study,
        page: "#study",
        anchor: "#study-delete",
    },
    EntryPoint {
        level: ResourceLevel::Series,
        page: "#series",
        anchor: "#series-delete",
    },
];

/// Starts the transfer workflow for the record displayed when it is activated.
#[derive(Clone)]
pub struct Trigger {
    level: ResourceLevel,
    workflow: Arc<TransferWorkflow>,
    record: Arc<dyn RecordContext>,
}

impl Trigger {
    pub fn level(&self) -> ResourceLevel {
        self.level
    }

    /// Send the displayed record to a peer chosen by the user.
    ///
    /// Returns [None] if no record is displayed.
    pub async fn activate(&self) -> Option<Outcome> {
        let Some(current) = self.record.current_resource() else {
            tracing::debug!(level = self.level.as_str(), "no record displayed");
            return None;
        };
        let resource_id = match OrthancId::try_new(current) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(level = self.level.as_str(), error = e.to_string(), "invalid record ID");
                return None;
            }
        };
        tracing::debug!(
            level = self.level.as_str(),
            resource = resource_id.as_str(),
            "transfer requested"
        );
        Some(self.workflow.run(self.level, resource_id).await)
    }
}

/// Adds the trigger controls to the browsing UI.
pub struct UiEntryPointBinder {
    workflow: Arc<TransferWorkflow>,
}

impl UiEntryPointBinder {
    pub fn new(workflow: Arc<TransferWorkflow>) -> Self {
        Self { workflow }
    }

    /// Attach one trigger per level. The record is looked up from `record`
    /// each time a trigger is activated.
    pub fn bind(&self, host: &dyn TriggerHost, record: Arc<dyn RecordContext>) {
        for entry in &ENTRY_POINTS {
            let trigger = Trigger {
                level: entry.level,
                workflow: Arc::clone(&self.workflow),
                record: Arc::clone(&record),
            };
            host.attach(entry, TRIGGER_LABEL, trigger);
        }
    }
}
