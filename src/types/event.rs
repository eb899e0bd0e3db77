//! Event types reported by producers
//!
//! An [`Event`] is a transient report of a lifecycle occurrence. It is consumed
//! once by the hub, folded into the state and recorded as a log entry.
//!
//! Unknown `kind` / `status` values on the wire deserialize into the
//! `Unknown` variants instead of failing, so newer producers can talk to an
//! older server.

use serde::{Deserialize, Serialize};

/// Kind of lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Artifact build progress
    Build,
    /// Deployment progress
    Deploy,
    /// A port was forwarded
    Port,
    /// Anything this server does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Build => write!(f, "build"),
            EventKind::Deploy => write!(f, "deploy"),
            EventKind::Port => write!(f, "port"),
            EventKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Status carried by build and deploy events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    Failed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::NotStarted => write!(f, "Not Started"),
            Status::InProgress => write!(f, "In Progress"),
            Status::Complete => write!(f, "Complete"),
            Status::Failed => write!(f, "Failed"),
            Status::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A forwarded port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortInfo {
    pub local_port: u16,
    pub remote_port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub container_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub port_name: String,
}

impl PortInfo {
    /// Port forward without pod/container metadata
    pub fn new(local_port: u16, remote_port: u16) -> Self {
        Self {
            local_port,
            remote_port,
            ..Default::default()
        }
    }

    pub fn with_pod(mut self, namespace: &str, pod_name: &str, container_name: &str) -> Self {
        self.namespace = namespace.to_string();
        self.pod_name = pod_name.to_string();
        self.container_name = container_name.to_string();
        self
    }
}

/// A lifecycle event submitted by a producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,

    #[serde(default)]
    pub status: Status,

    /// Artifact id, only meaningful for build events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,

    /// Port-forward descriptor, only meaningful for port events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_info: Option<PortInfo>,

    /// Error description, copied verbatim into the log entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Event {
    /// Create an event with no payload
    pub fn new(kind: EventKind, status: Status) -> Self {
        Self {
            kind,
            status,
            artifact: None,
            port_info: None,
            error: None,
        }
    }

    /// Build event for an artifact
    pub fn build(artifact: impl Into<String>, status: Status) -> Self {
        Self::new(EventKind::Build, status).with_artifact(artifact)
    }

    /// Deploy event
    pub fn deploy(status: Status) -> Self {
        Self::new(EventKind::Deploy, status)
    }

    /// Port-forward event
    pub fn port(port_info: PortInfo) -> Self {
        Self {
            port_info: Some(port_info),
            ..Self::new(EventKind::Port, Status::Complete)
        }
    }

    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
