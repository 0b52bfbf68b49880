// Docker containers via the docker CLI

pub mod parse;

use crate::command::{CommandRunner, CommandSpec};
use crate::enrich::enrich;
use crate::error::{CollectError, CommandError};
use crate::models::{ContainerRecord, ContainerUsage};
use std::sync::Arc;
use tracing::instrument;

const DOCKER: &str = "docker";

/// Fixed log tail, to bound the response size.
pub const LOG_TAIL_LINES: u32 = 100;

pub struct DockerRepo {
    runner: Arc<dyn CommandRunner>,
}

impl DockerRepo {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// All containers (running and stopped), with CPU/memory attached to running ones.
    ///
    /// A missing docker binary or an unreachable daemon yields an empty list.
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    pub async fn list_containers(&self) -> Result<Vec<ContainerRecord>, CollectError> {
        let spec = CommandSpec::new(DOCKER).args(["ps", "-a", "--format", parse::LIST_FORMAT]);
        let output = match self.runner.run(&spec).await {
            Ok(out) => out,
            Err(e) if runtime_unavailable(&e) => {
                tracing::debug!(error = %e, "docker unavailable; reporting no containers");
                return Ok(Vec::new());
            }
            Err(e) => return Err(CollectError::command("docker ps", e)),
        };

        let containers = parse::parse_container_list(&output).into_records("docker ps");
        let running: Vec<String> = containers
            .iter()
            .filter(|c| c.is_running())
            .map(|c| c.id.clone())
            .collect();
        if running.is_empty() {
            return Ok(containers);
        }

        let containers = enrich(
            containers,
            "docker stats",
            self.usage(&running),
            |records, usage| parse::apply_usage(records, &usage),
        )
        .await;
        Ok(containers)
    }

    /// One batched `docker stats` call for the given ids.
    async fn usage(&self, ids: &[String]) -> Result<Vec<ContainerUsage>, CommandError> {
        let spec = CommandSpec::new(DOCKER)
            .args(["stats", "--no-stream", "--format", parse::STATS_FORMAT])
            .args(ids.iter().cloned());
        let output = self.runner.run(&spec).await?;
        Ok(parse::parse_stats(&output).into_records("docker stats"))
    }

    pub async fn start_container(&self, id: &str) -> Result<(), CommandError> {
        self.lifecycle("start", id).await
    }

    pub async fn stop_container(&self, id: &str) -> Result<(), CommandError> {
        self.lifecycle("stop", id).await
    }

    pub async fn restart_container(&self, id: &str) -> Result<(), CommandError> {
        self.lifecycle("restart", id).await
    }

    #[instrument(skip(self), fields(repo = "docker"))]
    async fn lifecycle(&self, verb: &'static str, id: &str) -> Result<(), CommandError> {
        let spec = CommandSpec::new(DOCKER).args([verb, id]);
        self.runner.run(&spec).await?;
        tracing::info!(container = id, action = verb, "container action completed");
        Ok(())
    }

    /// Last [`LOG_TAIL_LINES`] lines of the container's stdout log.
    #[instrument(skip(self), fields(repo = "docker", operation = "fetch_logs"))]
    pub async fn fetch_logs(&self, id: &str) -> Result<String, CommandError> {
        let spec = CommandSpec::new(DOCKER).args(["logs", "--tail", &LOG_TAIL_LINES.to_string(), id]);
        self.runner.run(&spec).await
    }
}

/// Binary missing or not runnable, or the CLI could not reach the daemon.
fn runtime_unavailable(e: &CommandError) -> bool {
    match e {
        e if e.is_unavailable() => true,
        CommandError::NonZeroExit { stderr, .. } => {
            stderr.contains("Cannot connect") || stderr.contains("Is the docker daemon running")
        }
        _ => false,
    }
}
