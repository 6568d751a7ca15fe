use std::sync::Arc;
use transfers_api::{JobId, OrthancId, ResourceLevel};

use crate::catalog::{CatalogUnavailable, PeerCatalogClient};
use crate::dialog::{PeerSelectionDialog, Selection};
use crate::host::{Navigator, Notifier};
use crate::submitter::{Submission, SubmissionFailed, TransferJobSubmitter};

/// Message shown when Orthanc refused to create the transfer job.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Error while creating the transfer job";
/// Message shown when the peers cannot be listed, if enabled.
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Cannot get the list of Orthanc peers";
/// Message shown when Orthanc accepted the transfer without a local job, if enabled.
pub const NO_JOB_MESSAGE: &str = "The transfer was accepted, but no job was created on this Orthanc";

/// How a run of the workflow ended.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// The job was created and its status page opened.
    JobOpened(JobId),
    /// The user closed the dialog without choosing a peer.
    Cancelled,
    /// Orthanc accepted the request but did not say which job it created.
    NoJob,
    /// The peers could not be listed.
    CatalogUnavailable,
    /// Orthanc did not create the job.
    SubmissionFailed,
}

/// Which of the quiet outcomes are shown to the user.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Notices {
    pub missing_job: bool,
    pub catalog_failure: bool,
}

/// Reason for stopping a run early. Converting an error into [Halt] logs it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Halt {
    CatalogUnavailable,
    Cancelled,
    NoJob,
    SubmissionFailed,
}

impl From<CatalogUnavailable> for Halt {
    fn from(value: CatalogUnavailable) -> Self {
        value.trace();
        Self::CatalogUnavailable
    }
}

impl From<SubmissionFailed> for Halt {
    fn from(value: SubmissionFailed) -> Self {
        value.trace();
        Self::SubmissionFailed
    }
}

/// Send a resource to a peer chosen by the user: list the peers, let the user
/// choose one, create the transfer job, then show the job.
///
/// Every run has its own peer snapshot, dialog and request, so runs may overlap.
pub struct TransferWorkflow {
    catalog: PeerCatalogClient,
    dialog: PeerSelectionDialog,
    submitter: TransferJobSubmitter,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    notices: Notices,
}

impl TransferWorkflow {
    pub fn new(
        catalog: PeerCatalogClient,
        dialog: PeerSelectionDialog,
        submitter: TransferJobSubmitter,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            dialog,
            submitter,
            navigator,
            notifier,
            notices: Notices::default(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    /// Run the workflow for one resource.
    pub async fn run(&self, level: ResourceLevel, resource_id: OrthancId) -> Outcome {
        match self.try_run(level, resource_id).await {
            Ok(job) => {
                self.navigator.open_job(&job);
                Outcome::JobOpened(job)
            }
            Err(Halt::Cancelled) => Outcome::Cancelled,
            Err(Halt::SubmissionFailed) => {
                self.notifier.alert(SUBMISSION_FAILED_MESSAGE).await;
                Outcome::SubmissionFailed
            }
            Err(Halt::CatalogUnavailable) => {
                if self.notices.catalog_failure {
                    self.notifier.alert(CATALOG_UNAVAILABLE_MESSAGE).await;
                }
                Outcome::CatalogUnavailable
            }
            Err(Halt::NoJob) => {
                if self.notices.missing_job {
                    self.notifier.alert(NO_JOB_MESSAGE).await;
                }
                Outcome::NoJob
            }
        }
    }

    async fn try_run(&self, level: ResourceLevel, resource_id: OrthancId) -> Result<JobId, Halt> {
        let catalog = self.catalog.fetch().await?;
        let peer = match self.dialog.choose(catalog).await {
            Selection::Selected(peer) => peer,
            Selection::Cancelled => return Err(Halt::Cancelled),
        };
        match self.submitter.submit(level, resource_id, peer).await? {
            Submission::Job(job) => Ok(job),
            Submission::NoJob(_) => Err(Halt::NoJob),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use DialogAction::*;

    fn study(id: &str) -> OrthancId {
        OrthancId::try_new(id).unwrap()
    }

    #[tokio::test]
    async fn test_job_opened() {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            vec![Activate("A"), Close],
            FakeEngine::answering(json!({"ID": "job-42"})),
        );
        let outcome = fixture.workflow().run(ResourceLevel::Study, study("S1")).await;
        assert_eq!(outcome, Outcome::JobOpened(JobId::new("job-42")));
        assert_eq!(fixture.navigator.jobs(), vec![JobId::new("job-42")]);
        assert_eq!(fixture.navigator.routes(), vec!["#job?uuid=job-42".to_string()]);
        assert!(fixture.notifier.alerts().is_empty());
        let expected = json!({
            "Resources": [{"Level": "Study", "ID": "S1"}],
            "Compression": "gzip",
            "Peer": "A"
        });
        assert_eq!(fixture.engine.requests(), vec![expected]);
    }

    #[tokio::test]
    async fn test_no_job_is_silent() {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            vec![Activate("A"), Close],
            FakeEngine::answering(json!({})),
        );
        let outcome = fixture.workflow().run(ResourceLevel::Study, study("S1")).await;
        assert_eq!(outcome, Outcome::NoJob);
        assert!(fixture.navigator.jobs().is_empty());
        assert!(fixture.notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_no_job_notice() {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            vec![Activate("A"), Close],
            FakeEngine::answering(json!({})),
        );
        let notices = Notices {
            missing_job: true,
            catalog_failure: false,
        };
        let outcome = fixture
            .workflow()
            .with_notices(notices)
            .run(ResourceLevel::Study, study("S1"))
            .await;
        assert_eq!(outcome, Outcome::NoJob);
        assert_eq!(fixture.notifier.alerts(), vec![NO_JOB_MESSAGE.to_string()]);
        assert!(fixture.navigator.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failed() {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            vec![Activate("A"), Close],
            FakeEngine::failing(rejected),
        );
        let outcome = fixture.workflow().run(ResourceLevel::Series, study("X")).await;
        assert_eq!(outcome, Outcome::SubmissionFailed);
        assert_eq!(
            fixture.notifier.alerts(),
            vec![SUBMISSION_FAILED_MESSAGE.to_string()]
        );
        assert!(fixture.navigator.jobs().is_empty());
    }

    #[rstest]
    #[case::dismissed(vec![Dismiss, Close])]
    #[case::disabled_peer(vec![Activate("B"), Dismiss, Close])]
    #[tokio::test]
    async fn test_cancelled(#[case] actions: Vec<DialogAction>) {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            actions,
            FakeEngine::answering(json!({"ID": "job-42"})),
        );
        let outcome = fixture.workflow().run(ResourceLevel::Study, study("S1")).await;
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(fixture.engine.requests().is_empty());
        assert!(fixture.navigator.jobs().is_empty());
        assert!(fixture.notifier.alerts().is_empty());
    }

    #[rstest]
    #[case::silent(false, vec![])]
    #[case::notice(true, vec![CATALOG_UNAVAILABLE_MESSAGE.to_string()])]
    #[tokio::test]
    async fn test_catalog_unavailable(#[case] notify: bool, #[case] expected: Vec<String>) {
        let fixture = Fixture::new(
            FakeRegistry::failing(unavailable),
            vec![Activate("A"), Close],
            FakeEngine::answering(json!({"ID": "job-42"})),
        );
        let notices = Notices {
            missing_job: false,
            catalog_failure: notify,
        };
        let outcome = fixture
            .workflow()
            .with_notices(notices)
            .run(ResourceLevel::Patient, study("P1"))
            .await;
        assert_eq!(outcome, Outcome::CatalogUnavailable);
        assert_eq!(fixture.presenter.opened(), 0);
        assert!(fixture.engine.requests().is_empty());
        assert_eq!(fixture.notifier.alerts(), expected);
    }

    #[tokio::test]
    async fn test_overlapping_runs() {
        let fixture = Fixture::new(
            FakeRegistry::answering(catalog()),
            vec![Activate("C"), Close],
            FakeEngine::answering(json!({"ID": "job-42"})),
        );
        let workflow = fixture.workflow();
        let (a, b) = tokio::join!(
            workflow.run(ResourceLevel::Study, study("S1")),
            workflow.run(ResourceLevel::Series, study("S2"))
        );
        assert_eq!(a, Outcome::JobOpened(JobId::new("job-42")));
        assert_eq!(b, Outcome::JobOpened(JobId::new("job-42")));
        assert_eq!(fixture.registry.calls(), 2);
        assert_eq!(fixture.presenter.opened(), 2);
        assert_eq!(fixture.engine.requests().len(), 2);
    }
}
