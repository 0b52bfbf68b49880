// User-triggered actions: validate, run, then wake the refresh loops.

use crate::aggregator::Aggregator;
use crate::docker_repo::DockerRepo;
use crate::error::ActionError;
use crate::process_repo::ProcessRepo;
use std::sync::Arc;

pub struct Dispatcher {
    docker: Arc<DockerRepo>,
    processes: Arc<ProcessRepo>,
    aggregator: Arc<Aggregator>,
}

impl Dispatcher {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            docker: Arc::clone(aggregator.docker()),
            processes: Arc::clone(aggregator.processes()),
            aggregator,
        }
    }

    pub async fn start_container(&self, id: &str) -> Result<(), ActionError> {
        validate_container_id(id)?;
        let result = self
            .docker
            .start_container(id)
            .await
            .map_err(|e| ActionError::failed("start container", e));
        self.aggregator.request_refresh();
        result
    }

    pub async fn stop_container(&self, id: &str) -> Result<(), ActionError> {
        validate_container_id(id)?;
        let result = self
            .docker
            .stop_container(id)
            .await
            .map_err(|e| ActionError::failed("stop container", e));
        self.aggregator.request_refresh();
        result
    }

    pub async fn restart_container(&self, id: &str) -> Result<(), ActionError> {
        validate_container_id(id)?;
        let result = self
            .docker
            .restart_container(id)
            .await
            .map_err(|e| ActionError::failed("restart container", e));
        self.aggregator.request_refresh();
        result
    }

    /// Log tail. Read-only, so no refresh is requested.
    pub async fn container_logs(&self, id: &str) -> Result<String, ActionError> {
        validate_container_id(id)?;
        self.docker
            .fetch_logs(id)
            .await
            .map_err(|e| ActionError::failed("fetch logs", e))
    }

    pub async fn stop_process(&self, pid: &str) -> Result<(), ActionError> {
        let result = self.processes.stop_process(pid).await;
        if !matches!(result, Err(ActionError::InvalidInput(_))) {
            self.aggregator.request_refresh();
        }
        result
    }
}

/// Non-empty, `[A-Za-z0-9_.-]` only, and no leading `-` so it can never be read as a flag.
pub fn validate_container_id(id: &str) -> Result<(), ActionError> {
    let valid = !id.is_empty()
        && !id.starts_with('-')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ActionError::InvalidInput(format!("invalid container id: {id:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ids_and_names() {
        for id in ["a1b2c3d4e5f6", "my_app.web-1", "postgres"] {
            assert!(validate_container_id(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn rejects_empty_flags_and_shell_text() {
        for id in ["", "--rm", "-f", "abc;rm -rf /", "a b", "abc/def", "$(id)"] {
            assert!(
                matches!(validate_container_id(id), Err(ActionError::InvalidInput(_))),
                "{id}"
            );
        }
    }
}
