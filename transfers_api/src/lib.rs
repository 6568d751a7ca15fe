//! Orthanc transfers accelerator API request and response types.

mod peers;
mod send;
mod types;

pub use crate::peers::*;
pub use crate::send::*;
pub use crate::types::*;
