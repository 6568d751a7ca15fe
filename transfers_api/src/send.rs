use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::peers::SelectablePeer;
use crate::types::{JobId, ResourceId, TransferResource};

/// Compression of the buckets sent to the peer.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Gzip,
}

/// Request body of `POST /transfers/send`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TransferRequest {
    resources: Vec<TransferResource>,
    compression: Compression,
    peer: SelectablePeer,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
}

impl TransferRequest {
    /// Create a request to send one resource to a peer, compressed with gzip.
    pub fn new(resource: TransferResource, peer: SelectablePeer) -> Self {
        Self {
            resources: vec![resource],
            compression: Compression::Gzip,
            peer,
            priority: None,
        }
    }

    /// Set the priority of the job. Orthanc uses `0` when unset.
    pub fn with_priority(mut self, priority: Option<i32>) -> Self {
        self.priority = priority;
        self
    }

    pub fn resources(&self) -> &[TransferResource] {
        &self.resources
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn peer(&self) -> &SelectablePeer {
        &self.peer
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }
}

/// Response body of `POST /transfers/send`.
///
/// Orthanc answers with the local job in push mode, or with the job created
/// on the remote peer in pull mode. Anything else is kept as untyped JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SendResponse {
    Job(SubmittedJob),
    Pull(PullAcknowledgement),
    Other(serde_json::Value),
}

impl SendResponse {
    /// Parse a response body. Empty or malformed bodies become [SendResponse::Other].
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or(Self::Other(serde_json::Value::Null))
    }

    /// ID of the job created on this Orthanc, if any.
    pub fn job_id(&self) -> Option<&JobId> {
        if let Self::Job(job) = self {
            Some(&job.id)
        } else {
            None
        }
    }
}

/// A job enqueued by the local Orthanc.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmittedJob {
    #[serde(rename = "ID", deserialize_with = "job_id_from_text_or_number")]
    pub id: JobId,
    #[serde(rename = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl SubmittedJob {
    /// API path of the job, falling back to `/jobs/{id}` if Orthanc did not say.
    pub fn path(&self) -> String {
        self.path.clone().unwrap_or_else(|| self.id.uri())
    }
}

/// Orthanc job IDs are strings, but any number is also accepted as an ID.
fn job_id_from_text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JobId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }
    let id = match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    };
    Ok(JobId::new(id))
}

/// A job enqueued on the remote peer (pull mode).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PullAcknowledgement {
    pub peer: CompactString,
    pub remote_job: JobId,
    #[serde(rename = "URL")]
    pub url: String,
}
