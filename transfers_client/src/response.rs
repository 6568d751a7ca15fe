use http::StatusCode;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// A response from the Orthanc REST API, with its body fully read.
pub struct RestResponse<D> {
    pub uri: String,
    pub status: StatusCode,
    body: Vec<u8>,
    phantom: PhantomData<D>,
}

impl<D> RestResponse<D> {
    pub(crate) fn new(uri: String, status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            uri,
            status,
            body,
            phantom: Default::default(),
        }
    }

    /// Raw response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Produce [Err] if the HTTP status is not 2xx.
    pub fn ensure_success(self) -> Result<Self, ResponseError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ResponseError::Status {
                uri: self.uri,
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

impl<D: DeserializeOwned> RestResponse<D> {
    /// Get the data from a successful response.
    ///
    /// # Return Values
    ///
    /// | Value                         | Meaning                           |
    /// |-------------------------------|-----------------------------------|
    /// | `Err(ResponseError::Status)`  | Orthanc did not respond with 2xx  |
    /// | `Err(ResponseError::Json)`    | JSON deserialization failed       |
    /// | `Ok(_)`                       | Successful response               |
    pub fn data(self) -> Result<D, ResponseError> {
        let res = self.ensure_success()?;
        serde_json::from_slice(&res.body).map_err(|source| ResponseError::Json {
            uri: res.uri,
            source,
        })
    }
}

/// Error calling the Orthanc REST API.
#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    /// The request could not be sent or the response could not be read.
    #[error("request to {uri} failed: {source}")]
    Request {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    /// Orthanc responded with a status other than 2xx.
    #[error("{uri} responded with status {status}")]
    Status {
        uri: String,
        status: StatusCode,
        body: String,
    },
    /// The response body is not the expected JSON.
    #[error("unexpected response from {uri}: {source}")]
    Json {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
    /// The URI could not be resolved against the base URL.
    #[error("invalid URI {uri}: {source}")]
    Url {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

impl ResponseError {
    /// The API URI which was called.
    pub fn uri(&self) -> &str {
        match self {
            Self::Request { uri, .. } => uri,
            Self::Status { uri, .. } => uri,
            Self::Json { uri, .. } => uri,
            Self::Url { uri, .. } => uri,
        }
    }

    /// HTTP status code of the response, if there was a response.
    pub fn status(&self) -> Option<StatusCode> {
        if let Self::Status { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }

    /// Log this error.
    pub fn trace(&self) {
        match self {
            Self::Status { uri, status, body } => tracing::error!(
                uri = uri.as_str(),
                status = status.as_u16(),
                body = body.as_str(),
                "Unsuccessful response from Orthanc"
            ),
            _ => tracing::error!(uri = self.uri(), error = self.to_string(), "Request failed"),
        }
    }
}
