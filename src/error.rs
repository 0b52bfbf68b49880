// Error types shared by the collectors, the command runner and the dispatcher

use std::time::Duration;
use thiserror::Error;

/// Failure of a single external command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("permission denied running {0}")]
    PermissionDenied(String),

    #[error("command exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// True when the tool is absent or the caller may not run it at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CommandError::NotFound(_) | CommandError::PermissionDenied(_)
        )
    }
}

/// Collector failure that is not covered by the degrade-to-empty policy.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{operation} failed: {source}")]
    Command {
        operation: &'static str,
        #[source]
        source: CommandError,
    },
}

impl CollectError {
    pub fn command(operation: &'static str, source: CommandError) -> Self {
        CollectError::Command { operation, source }
    }
}

/// Outcome of a user-triggered action that did not succeed.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Rejected before any external command ran.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{action} failed: {source}")]
    Failed {
        action: &'static str,
        #[source]
        source: CommandError,
    },
}

impl ActionError {
    pub fn failed(action: &'static str, source: CommandError) -> Self {
        ActionError::Failed { action, source }
    }
}
