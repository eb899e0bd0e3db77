//! State snapshot types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{PortInfo, Status};

/// Per-artifact build status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuildState {
    #[serde(default)]
    pub artifacts: HashMap<String, Status>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeployState {
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortState {
    /// Append-only for the lifetime of the hub
    #[serde(default)]
    pub forwarded_ports: Vec<PortInfo>,
}

/// Current status of the build, deploy and port-forward phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct State {
    #[serde(default)]
    pub build_state: BuildState,
    #[serde(default)]
    pub deploy_state: DeployState,
    #[serde(default)]
    pub port_state: PortState,
}

impl State {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with every known artifact marked as not started
    pub fn with_artifacts<I, S>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let artifacts = artifacts
            .into_iter()
            .map(|a| (a.into(), Status::NotStarted))
            .collect();

        Self {
            build_state: BuildState { artifacts },
            ..Default::default()
        }
    }

    /// Status of one artifact, if it has been seen
    pub fn artifact_status(&self, artifact: &str) -> Option<Status> {
        self.build_state.artifacts.get(artifact).copied()
    }
}
