//! Helper functions for common producer events
//!
//! Thin wrappers used by the build, deploy and port-forward code paths so
//! they do not have to assemble [`Event`] values by hand.

use super::EventHub;
use crate::types::{Ack, Event, PortInfo, Status};

/// Report that an artifact build started
pub fn build_in_progress(hub: &EventHub, artifact: &str) -> Ack {
    hub.handle(Event::build(artifact, Status::InProgress))
}

/// Report that an artifact build finished
pub fn build_complete(hub: &EventHub, artifact: &str) -> Ack {
    hub.handle(Event::build(artifact, Status::Complete))
}

/// Report that an artifact build failed
pub fn build_failed(hub: &EventHub, artifact: &str, err: &dyn std::error::Error) -> Ack {
    hub.handle(Event::build(artifact, Status::Failed).with_error(err.to_string()))
}

pub fn deploy_in_progress(hub: &EventHub) -> Ack {
    hub.handle(Event::deploy(Status::InProgress))
}

pub fn deploy_complete(hub: &EventHub) -> Ack {
    hub.handle(Event::deploy(Status::Complete))
}

pub fn deploy_failed(hub: &EventHub, err: &dyn std::error::Error) -> Ack {
    hub.handle(Event::deploy(Status::Failed).with_error(err.to_string()))
}

/// Report an established port forward
pub fn port_forwarded(hub: &EventHub, port_info: PortInfo) -> Ack {
    hub.handle(Event::port(port_info))
}
