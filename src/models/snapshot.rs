// Aggregated snapshot: the last successful result per collector plus its health.

use super::{ContainerRecord, DevProcess, GitRepoStatus, ListeningPort};
use serde::Serialize;
use std::sync::Arc;

/// Refresh bookkeeping for one collector. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorStatus {
    /// Last time the collector produced data; `None` until the first success.
    pub refreshed_at: Option<u64>,
    pub last_attempt_at: Option<u64>,
    /// Error of the most recent attempt; cleared on success.
    pub last_error: Option<String>,
    pub refresh_count: u64,
    pub failure_count: u64,
}

impl CollectorStatus {
    /// Failed and has never produced data.
    pub fn never_succeeded(&self) -> bool {
        self.refreshed_at.is_none() && self.last_error.is_some()
    }
}

/// One collector's data, replaced wholesale on every publish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorSlot<T> {
    pub items: Arc<Vec<T>>,
    pub status: CollectorStatus,
}

impl<T> Default for CollectorSlot<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            status: CollectorStatus::default(),
        }
    }
}

impl<T> CollectorSlot<T> {
    pub(crate) fn published(&self, items: Vec<T>, at: u64) -> Self {
        Self {
            items: Arc::new(items),
            status: CollectorStatus {
                refreshed_at: Some(at),
                last_attempt_at: Some(at),
                last_error: None,
                refresh_count: self.status.refresh_count + 1,
                failure_count: self.status.failure_count,
            },
        }
    }

    /// Keeps the previous items; only the status changes.
    pub(crate) fn failed(&self, error: String, at: u64) -> Self {
        Self {
            items: self.items.clone(),
            status: CollectorStatus {
                refreshed_at: self.status.refreshed_at,
                last_attempt_at: Some(at),
                last_error: Some(error),
                refresh_count: self.status.refresh_count,
                failure_count: self.status.failure_count + 1,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub containers: CollectorSlot<ContainerRecord>,
    pub ports: CollectorSlot<ListeningPort>,
    pub processes: CollectorSlot<DevProcess>,
    pub git: CollectorSlot<GitRepoStatus>,
}
