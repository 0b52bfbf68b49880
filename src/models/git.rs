// Git repository status models

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoStatus {
    pub path: String,
    pub name: String,
    pub branch: String,
    pub dirty: bool,
    pub uncommitted_count: u32,
    pub unpushed_count: u32,
    pub behind_count: u32,
}

impl GitRepoStatus {
    /// Dirty first, then by name (case-insensitive, then exact), then path.
    pub fn attention_order(a: &Self, b: &Self) -> Ordering {
        b.dirty
            .cmp(&a.dirty)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.path.cmp(&b.path))
    }
}

/// Final path segment of a repository root; the whole path if it has none.
pub fn repo_display_name(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}
