// Listening TCP port models

use serde::{Deserialize, Serialize};

pub const WILDCARD_ADDRESS: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningPort {
    pub port: u16,
    pub local_address: String,
    pub pid: u32,
    pub process: String,
    /// Always "TCP".
    pub protocol: String,
    pub command: Option<String>,
    pub cwd: Option<String>,
    pub user: Option<String>,
    /// RFC 3339, local time.
    pub start_time: Option<String>,
}

impl ListeningPort {
    pub fn new(port: u16, local_address: String, pid: u32, process: String) -> Self {
        Self {
            port,
            local_address,
            pid,
            process,
            protocol: "TCP".into(),
            command: None,
            cwd: None,
            user: None,
            start_time: None,
        }
    }
}

/// Owner details for a pid, from a single `ps` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDetails {
    pub user: String,
    pub start_time: Option<String>,
    pub command: String,
}
