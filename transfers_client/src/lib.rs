//! Client for the REST API of the Orthanc transfers accelerator plugin.
//!
//! [PeersClient] reads the peers registry and [TransfersClient] schedules
//! transfer jobs. Both implement a trait ([PeerRegistry] and [JobEngine])
//! so that callers can substitute them.

mod client;
mod peers;
mod response;
mod transfers;

pub use client::BaseClient;
pub use peers::{PeerRegistry, PeersClient, URI_PEERS};
pub use response::*;
pub use transfers::{JobEngine, TransfersClient, URI_SEND};

pub use transfers_api as types;
