use nutype::nutype;
use serde::{Deserialize, Serialize};

/// ID of an Orthanc job.
#[nutype(derive(Serialize, Deserialize, Clone, Display, Debug, Eq, PartialEq, Hash, AsRef))]
pub struct JobId(String);

impl ResourceId for JobId {
    fn uri(&self) -> String {
        format!("/jobs/{}", &self)
    }
}

impl JobId {
    /// Route of the job-status page of Orthanc Explorer for this job.
    pub fn view_route(&self) -> String {
        format!("#job?uuid={}", &self)
    }
}

/// ID of a patient, study or series stored by Orthanc.
///
/// Orthanc IDs are opaque, the only requirement is that they are not blank.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Serialize, Deserialize, Clone, Hash, Eq, PartialEq, AsRef, Deref, Debug, Display)
)]
pub struct OrthancId(String);

/// Level of a DICOM resource in the patient/study/series hierarchy.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceLevel {
    Patient,
    Study,
    Series,
}

impl ResourceLevel {
    /// All the levels which can be sent to a peer, from the top of the hierarchy.
    pub const ALL: [ResourceLevel; 3] = [Self::Patient, Self::Study, Self::Series];

    /// Name of the level as it appears in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Study => "Study",
            Self::Series => "Series",
        }
    }
}

impl std::fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ID of an Orthanc resource.
pub trait ResourceId {
    /// Get the API URI of this resource.
    fn uri(&self) -> String;
}

impl<T> ResourceId for &T
where
    T: ResourceId,
{
    fn uri(&self) -> String {
        (*self).uri()
    }
}

/// A DICOM resource at a given level.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TransferResource {
    #[serde(rename = "Level")]
    pub level: ResourceLevel,
    #[serde(rename = "ID")]
    pub id: OrthancId,
}

impl TransferResource {
    pub fn new(level: ResourceLevel, id: OrthancId) -> Self {
        Self { level, id }
    }
}

impl ResourceId for TransferResource {
    fn uri(&self) -> String {
        match self.level {
            ResourceLevel::Patient => format!("/patients/{}", &self.id),
            ResourceLevel::Study => format!("/studies/{}", &self.id),
            ResourceLevel::Series => format!("/series/{}", &self.id),
        }
    }
}
