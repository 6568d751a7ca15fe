use serde::Deserialize;
use serde_with::{DurationMilliSeconds, DurationSeconds, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::dialog::CloseDetection;

/// Orthanc configuration file.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrthancConfig {
    transfers: Option<TransfersConfig>,
}

/// How the end of the peer selection dialog is detected.
#[derive(Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CloseDetectionMode {
    /// The host reports when the dialog is torn down.
    #[default]
    Event,
    /// The dialog polls the visibility of the host surface.
    Poll,
}

/// Transfers section of the Orthanc configuration file.
///
/// The server-side settings of the transfers accelerator (`Threads`,
/// `BucketSize`, ...) share this section and are ignored here.
#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransfersConfig {
    /// Base URL of the local Orthanc REST API.
    pub url: Url,
    /// Log info messages as warnings.
    pub verbose: bool,
    /// Priority of the transfer jobs. Orthanc uses `0` when unset.
    pub priority: Option<i32>,
    /// Maximum wait for the list of peers.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub catalog_timeout: Duration,
    /// Maximum wait for Orthanc to accept a transfer job.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub submit_timeout: Duration,
    pub dialog_close_detection: CloseDetectionMode,
    /// Interval between visibility checks when [CloseDetectionMode::Poll] is used.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub dialog_poll_interval: Duration,
    /// Tell the user when Orthanc accepted the transfer without creating a local job.
    pub notify_missing_job: bool,
    /// Tell the user when the list of peers is not available.
    pub notify_catalog_failure: bool,
}

impl Default for TransfersConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8042/").expect("valid default URL"),
            verbose: false,
            priority: None,
            catalog_timeout: Duration::from_secs(10),
            submit_timeout: Duration::from_secs(60),
            dialog_close_detection: CloseDetectionMode::Event,
            dialog_poll_interval: Duration::from_millis(100),
            notify_missing_job: false,
            notify_catalog_failure: false,
        }
    }
}

impl TransfersConfig {
    /// Read the transfers section from the content of an Orthanc configuration file.
    ///
    /// Defaults are used if the section is missing.
    pub fn from_orthanc_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: OrthancConfig = serde_json::from_slice(data)?;
        let config = config.transfers.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Read the transfers section of an Orthanc configuration file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_orthanc_json(&data)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dialog_poll_interval.is_zero() {
            return Err(ConfigError::Invalid("DialogPollInterval must be positive"));
        }
        if self.catalog_timeout.is_zero() {
            return Err(ConfigError::Invalid("CatalogTimeout must be positive"));
        }
        if self.submit_timeout.is_zero() {
            return Err(ConfigError::Invalid("SubmitTimeout must be positive"));
        }
        Ok(())
    }

    /// Close detection strategy of the peer selection dialog.
    pub fn close_detection(&self) -> CloseDetection {
        match self.dialog_close_detection {
            CloseDetectionMode::Event => CloseDetection::Event,
            CloseDetectionMode::Poll => CloseDetection::Poll(self.dialog_poll_interval),
        }
    }
}

/// Error reading the configuration or setting up the clients.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid Orthanc configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid Transfers configuration: {0}")]
    Invalid(&'static str),
    #[error("cannot create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
