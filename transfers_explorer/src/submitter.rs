use std::sync::Arc;
use std::time::Duration;
use transfers_api::{
    JobId, OrthancId, ResourceId, ResourceLevel, SelectablePeer, SendResponse, TransferRequest,
    TransferResource,
};
use transfers_client::{JobEngine, ResponseError};

/// Result of submitting a transfer request which Orthanc accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Orthanc created a local job.
    Job(JobId),
    /// Orthanc responded successfully but without a local job ID.
    NoJob(SendResponse),
}

/// Builds transfer requests and submits them to the job engine.
#[derive(Clone)]
pub struct TransferJobSubmitter {
    engine: Arc<dyn JobEngine>,
    priority: Option<i32>,
    timeout: Duration,
}

impl TransferJobSubmitter {
    pub fn new(engine: Arc<dyn JobEngine>, timeout: Duration) -> Self {
        Self {
            engine,
            priority: None,
            timeout,
        }
    }

    /// Set the priority of the submitted jobs.
    pub fn with_priority(mut self, priority: Option<i32>) -> Self {
        self.priority = priority;
        self
    }

    /// Ask Orthanc to send a resource to a peer. The request is never retried.
    pub async fn submit(
        &self,
        level: ResourceLevel,
        resource_id: OrthancId,
        peer: SelectablePeer,
    ) -> Result<Submission, SubmissionFailed> {
        let resource = TransferResource::new(level, resource_id);
        let uri = resource.uri();
        let request = TransferRequest::new(resource, peer).with_priority(self.priority);
        tracing::info!(
            resource = uri,
            peer = request.peer().as_str(),
            "Sending resource to peer"
        );
        let response = tokio::time::timeout(self.timeout, self.engine.submit(&request))
            .await
            .map_err(|_| SubmissionFailed::Timeout(self.timeout))??;
        match response {
            SendResponse::Job(job) => {
                tracing::info!(job = job.id.to_string(), path = job.path(), "transfer job created");
                Ok(Submission::Job(job.id))
            }
            SendResponse::Pull(ack) => {
                tracing::info!(
                    peer = ack.peer.as_str(),
                    remote_job = ack.remote_job.to_string(),
                    url = ack.url.as_str(),
                    "transfer job created on remote peer"
                );
                Ok(Submission::NoJob(SendResponse::Pull(ack)))
            }
            other => {
                tracing::warn!(response = other_to_string(&other), "no job ID in response");
                Ok(Submission::NoJob(other))
            }
        }
    }
}

fn other_to_string(response: &SendResponse) -> String {
    serde_json::to_string(response).unwrap_or_default()
}

/// The transfer job could not be created.
#[derive(thiserror::Error, Debug)]
pub enum SubmissionFailed {
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("no response from the job engine within {0:?}")]
    Timeout(Duration),
}

impl SubmissionFailed {
    /// Log this error.
    pub fn trace(&self) {
        match self {
            Self::Response(e) => e.trace(),
            Self::Timeout(timeout) => tracing::error!(
                timeout_ms = timeout.as_millis() as u64,
                "Job engine did not respond"
            ),
        }
    }
}
