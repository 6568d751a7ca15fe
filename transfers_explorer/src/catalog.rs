use std::sync::Arc;
use std::time::Duration;
use transfers_api::PeerCatalog;
use transfers_client::{PeerRegistry, ResponseError, URI_PEERS};

/// Fetches the peers which can receive a transfer.
#[derive(Clone)]
pub struct PeerCatalogClient {
    registry: Arc<dyn PeerRegistry>,
    timeout: Duration,
}

impl PeerCatalogClient {
    pub fn new(registry: Arc<dyn PeerRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Get a fresh snapshot of the peers from the registry.
    pub async fn fetch(&self) -> Result<PeerCatalog, CatalogUnavailable> {
        let catalog = tokio::time::timeout(self.timeout, self.registry.fetch_peers())
            .await
            .map_err(|_| CatalogUnavailable::Timeout(self.timeout))??;
        tracing::debug!(peers = catalog.len(), "fetched peers");
        Ok(catalog)
    }
}

/// The list of peers could not be obtained.
#[derive(thiserror::Error, Debug)]
pub enum CatalogUnavailable {
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("no response from the peers registry within {0:?}")]
    Timeout(Duration),
}

impl CatalogUnavailable {
    /// Log this error.
    pub fn trace(&self) {
        match self {
            Self::Response(e) => tracing::warn!(
                uri = e.uri(),
                status = e.status().map(|status| status.as_u16()),
                error = e.to_string(),
                "Cannot list peers"
            ),
            Self::Timeout(timeout) => tracing::warn!(
                uri = URI_PEERS,
                timeout_ms = timeout.as_millis() as u64,
                "Peers registry did not respond"
            ),
        }
    }
}
