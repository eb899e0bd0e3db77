//! Data types for the build events server
//!
//! This module contains the wire and storage representations shared by the
//! state aggregator, the event log and the HTTP API.

mod event;
mod log_entry;
mod state;

pub use event::{Event, EventKind, PortInfo, Status};
pub use log_entry::{LogEntry, SequencedEntry};
pub use state::{BuildState, DeployState, PortState, State};

/// Acknowledgement returned for every ingested event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Ack {}
