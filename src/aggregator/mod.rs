//! State Aggregator - folds events into the current state
//!
//! The aggregator owns the single canonical [`State`]. It is not synchronized
//! on its own: the hub keeps it behind the same lock as the event log so a
//! state mutation and the matching log append are observed together.

mod messages;

pub use messages::derive_message;

use crate::types::{Event, EventKind, State};

/// Owner of the mutable build/deploy/port state
#[derive(Debug, Default)]
pub struct StateAggregator {
    state: State,
}

impl StateAggregator {
    /// Create an aggregator with an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator starting from a seeded state
    pub fn with_state(state: State) -> Self {
        Self { state }
    }

    /// Apply one event and return the derived log message
    ///
    /// Only the sub-state matching the event kind is touched. Unknown kinds
    /// leave the state unchanged and yield an empty message.
    pub fn apply(&mut self, event: &Event) -> String {
        let artifact = event.artifact.as_deref().unwrap_or_default();

        match event.kind {
            EventKind::Build => {
                self.state
                    .build_state
                    .artifacts
                    .insert(artifact.to_string(), event.status);
            }
            EventKind::Deploy => {
                self.state.deploy_state.status = event.status;
            }
            EventKind::Port => {
                if let Some(port) = &event.port_info {
                    self.state.port_state.forwarded_ports.push(port.clone());
                }
            }
            EventKind::Unknown => {}
        }

        derive_message(event.kind, event.status, artifact)
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> State {
        self.state.clone()
    }

    /// Borrow the current state
    pub fn state(&self) -> &State {
        &self.state
    }
}
