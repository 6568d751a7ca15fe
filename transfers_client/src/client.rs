use super::response::{ResponseError, RestResponse};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Methods for calling the REST API of the local Orthanc.
#[derive(Clone, Debug)]
pub struct BaseClient {
    http: reqwest::Client,
    base: Url,
}

impl BaseClient {
    /// Create a [BaseClient] for the Orthanc served at `base`.
    ///
    /// `base` may contain a path prefix (e.g. `http://example.org/orthanc`).
    pub fn new(http: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { http, base }
    }

    /// Create a [BaseClient] with its own connection pool, where every request
    /// is bounded by `timeout`.
    pub fn with_timeout(base: Url, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http, base))
    }

    /// Base URL of Orthanc.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, uri: &str) -> Result<Url, ResponseError> {
        self.base
            .join(uri.trim_start_matches('/'))
            .map_err(|source| ResponseError::Url {
                uri: uri.to_string(),
                source,
            })
    }

    /// Make a GET call to the Orthanc REST API.
    pub async fn get<D>(&self, uri: &str) -> Result<RestResponse<D>, ResponseError> {
        let url = self.url(uri)?;
        let request = self.http.get(url).header(http::header::ACCEPT, "application/json");
        self.execute(uri, request).await
    }

    /// Make a POST call with a JSON body to the Orthanc REST API.
    pub async fn post<D, B: Serialize + ?Sized>(
        &self,
        uri: &str,
        body: &B,
    ) -> Result<RestResponse<D>, ResponseError> {
        let url = self.url(uri)?;
        let request = self.http.post(url).json(body);
        self.execute(uri, request).await
    }

    async fn execute<D>(
        &self,
        uri: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<RestResponse<D>, ResponseError> {
        let to_error = |source| ResponseError::Request {
            uri: uri.to_string(),
            source,
        };
        let response = request.send().await.map_err(to_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(to_error)?.to_vec();
        tracing::debug!(uri, status = status.as_u16(), size = body.len(), "Orthanc response");
        Ok(RestResponse::new(uri.to_string(), status, body))
    }
}
