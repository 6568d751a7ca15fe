use super::client::BaseClient;
use super::response::ResponseError;
use async_trait::async_trait;
use transfers_api::PeerCatalog;

/// URI of the peers registry of the transfers accelerator plugin.
pub const URI_PEERS: &str = "/transfers/peers";

/// Source of the Orthanc peers which can receive a transfer.
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Get a snapshot of the peers and their capabilities.
    async fn fetch_peers(&self) -> Result<PeerCatalog, ResponseError>;
}

/// Orthanc client for the peers registry of the transfers accelerator.
///
/// Ref: <https://orthanc.uclouvain.be/book/plugins/transfers.html#rest-api>
#[derive(Clone, Debug)]
pub struct PeersClient(BaseClient);

impl PeersClient {
    pub fn new(client: BaseClient) -> Self {
        Self(client)
    }

    /// List Orthanc peers and whether they run the transfers accelerator.
    pub async fn list(&self) -> Result<PeerCatalog, ResponseError> {
        self.0.get(URI_PEERS).await?.data()
    }
}

#[async_trait]
impl PeerRegistry for PeersClient {
    async fn fetch_peers(&self) -> Result<PeerCatalog, ResponseError> {
        self.list().await
    }
}
