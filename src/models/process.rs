// Developer process models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevProcess {
    pub pid: u32,
    pub name: String,
    pub command: String,
    /// CPU usage percentage.
    pub cpu: f64,
    /// Memory usage percentage.
    pub memory: f64,
    pub cwd: Option<String>,
}

impl DevProcess {
    /// True when the short name or full command contains any of `patterns`.
    pub fn matches_any(&self, patterns: &[String]) -> bool {
        patterns
            .iter()
            .any(|p| self.name.contains(p.as_str()) || self.command.contains(p.as_str()))
    }
}
