// Docker container models

use serde::{Deserialize, Serialize};

/// Container lifecycle state; serializes to lowercase JSON (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    #[serde(other)]
    Other,
}

impl ContainerState {
    /// Parse from the runtime's state column (e.g. "running", "exited").
    pub fn from_docker(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "paused" => ContainerState::Paused,
            _ => ContainerState::Other,
        }
    }
}

/// One published (or exposed-only) container port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortBinding {
    /// `None` when the port is exposed but not published to the host.
    pub host: Option<u16>,
    pub container: u16,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Human status, e.g. "Up 2 hours" or "Exited (0) 3 days ago".
    pub status: String,
    pub state: ContainerState,
    pub ports: Vec<PortBinding>,
    pub created: String,
    /// e.g. "0.50%"; only set for running containers.
    pub cpu: Option<String>,
    /// e.g. "50MiB / 512MiB"; only set for running containers.
    pub memory: Option<String>,
}

impl ContainerRecord {
    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }
}

/// One row of the batched resource-usage query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerUsage {
    pub id: String,
    pub cpu: String,
    pub memory: String,
}
