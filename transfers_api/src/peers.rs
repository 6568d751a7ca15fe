use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability of an Orthanc peer, as reported by
/// [`/transfers/peers`](https://orthanc.uclouvain.be/book/plugins/transfers.html#rest-api).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PeerCapability {
    /// The peer runs the transfers accelerator plugin (push mode).
    Installed,
    /// The peer runs the transfers accelerator plugin and can reach back to
    /// this Orthanc (pull mode, configured with `"RemoteSelf"`).
    Bidirectional,
    /// The peer does not run the transfers accelerator plugin, or is unreachable.
    Disabled,
    /// Any value this crate does not know about.
    #[serde(other)]
    Other,
}

impl PeerCapability {
    /// Whether a peer with this capability can be chosen as the target of a transfer.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Installed | Self::Bidirectional)
    }
}

/// Snapshot of the Orthanc peers known to the registry and their capabilities,
/// ordered by peer name.
///
/// Response type of `GET /transfers/peers`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PeerCatalog(BTreeMap<CompactString, PeerCapability>);

impl PeerCatalog {
    /// Iterate over peer names and their capabilities.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PeerCapability)> {
        self.0.iter().map(|(name, cap)| (name.as_str(), *cap))
    }

    /// Get the capability of a peer.
    pub fn capability(&self, name: &str) -> Option<PeerCapability> {
        self.0.get(name).copied()
    }

    /// Look up a peer which can be the target of a transfer.
    ///
    /// Returns [None] if the peer is unknown or not selectable.
    pub fn selectable(&self, name: &str) -> Option<SelectablePeer> {
        self.0
            .get_key_value(name)
            .filter(|(_, cap)| cap.is_selectable())
            .map(|(name, _)| SelectablePeer(name.clone()))
    }

    /// Returns `true` if the registry knows no peer.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of peers.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(CompactString, PeerCapability)> for PeerCatalog {
    fn from_iter<T: IntoIterator<Item = (CompactString, PeerCapability)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Name of a peer which was present and selectable in a [PeerCatalog].
///
/// Can only be obtained through [PeerCatalog::selectable].
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct SelectablePeer(CompactString);

impl SelectablePeer {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for SelectablePeer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SelectablePeer {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SelectablePeer {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
