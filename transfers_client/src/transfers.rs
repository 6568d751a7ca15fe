use super::client::BaseClient;
use super::response::ResponseError;
use async_trait::async_trait;
use transfers_api::{SendResponse, TransferRequest};

/// URI for scheduling the transfer of DICOM resources to a peer.
pub const URI_SEND: &str = "/transfers/send";

/// Engine which runs transfer jobs.
#[async_trait]
pub trait JobEngine: Send + Sync {
    /// Enqueue a transfer job. Only non-2xx responses and transport failures are errors.
    async fn submit(&self, request: &TransferRequest) -> Result<SendResponse, ResponseError>;
}

/// Orthanc client for scheduling transfers.
#[derive(Clone, Debug)]
pub struct TransfersClient(BaseClient);

impl TransfersClient {
    pub fn new(client: BaseClient) -> Self {
        Self(client)
    }

    /// Send DICOM resources stored locally to some remote Orthanc peer
    /// running the transfers accelerator.
    pub async fn send(&self, request: &TransferRequest) -> Result<SendResponse, ResponseError> {
        let response = self
            .0
            .post::<SendResponse, _>(URI_SEND, request)
            .await?
            .ensure_success()?;
        Ok(SendResponse::from_body(response.body()))
    }
}

#[async_trait]
impl JobEngine for TransfersClient {
    async fn submit(&self, request: &TransferRequest) -> Result<SendResponse, ResponseError> {
        self.send(request).await
    }
}
