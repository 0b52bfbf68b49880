// Developer processes via ps, working directories via lsof

pub mod parse;

use crate::command::{CommandRunner, CommandSpec};
use crate::enrich::enrich;
use crate::error::{ActionError, CollectError, CommandError};
use crate::models::{DevProcess, ProcessDetails};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::instrument;

/// Per-pid lookups (cwd, owner details) running at once unless configured otherwise.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

pub struct ProcessRepo {
    runner: Arc<dyn CommandRunner>,
    patterns: Vec<String>,
    max_rows: usize,
    lookup_concurrency: usize,
}

impl ProcessRepo {
    pub fn new(runner: Arc<dyn CommandRunner>, patterns: Vec<String>, max_rows: usize) -> Self {
        Self {
            runner,
            patterns,
            max_rows,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    /// Dev processes, CPU-descending, or an empty list when `ps` cannot run.
    pub async fn list_dev_processes(&self) -> Vec<DevProcess> {
        self.collect().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, operation = "list_dev_processes", "process listing failed");
            Vec::new()
        })
    }

    /// Like [`Self::list_dev_processes`] but reports a failed listing.
    #[instrument(skip(self), fields(repo = "processes", operation = "collect"))]
    pub async fn collect(&self) -> Result<Vec<DevProcess>, CollectError> {
        let output = self
            .runner
            .run(&ps_listing_command())
            .await
            .map_err(|e| CollectError::command("ps", e))?;

        let candidates: Vec<DevProcess> = parse::parse_ps(&output, self.max_rows)
            .into_records("ps")
            .into_iter()
            .filter(|p| p.matches_any(&self.patterns))
            .collect();

        let runner = self.runner.as_ref();
        let processes = stream::iter(candidates)
            .map(|p| {
                let pid = p.pid;
                enrich(p, "process cwd", working_dir(runner, pid), |p, cwd| {
                    p.cwd = cwd
                })
            })
            .buffered(self.lookup_concurrency)
            .collect()
            .await;
        Ok(processes)
    }

    /// Sends SIGTERM (plain `kill`) to `pid`. Input is validated before anything runs.
    #[instrument(skip(self), fields(repo = "processes", operation = "stop_process"))]
    pub async fn stop_process(&self, pid: &str) -> Result<(), ActionError> {
        let pid = parse_pid(pid)?;
        let spec = CommandSpec::new("kill").arg(pid.to_string());
        self.runner
            .run(&spec)
            .await
            .map_err(|e| ActionError::failed("stop process", e))?;
        tracing::info!(pid, "process signalled");
        Ok(())
    }
}

/// Accepts a positive decimal pid. Zero and negatives would signal process groups.
pub fn parse_pid(pid: &str) -> Result<u32, ActionError> {
    let trimmed = pid.trim();
    match trimmed.parse::<i32>() {
        Ok(n) if n > 0 => Ok(n as u32),
        _ => Err(ActionError::InvalidInput(format!("invalid pid: {pid:?}"))),
    }
}

fn ps_listing_command() -> CommandSpec {
    if cfg!(target_os = "macos") {
        CommandSpec::new("ps").args(["-Aro", "pid,pcpu,pmem,comm,args"])
    } else {
        CommandSpec::new("ps").args(["-eo", "pid,pcpu,pmem,comm,args", "--sort=-pcpu"])
    }
}

/// Current working directory of `pid`; `Ok(None)` when lsof lists no cwd entry.
pub async fn working_dir(
    runner: &dyn CommandRunner,
    pid: u32,
) -> Result<Option<String>, CommandError> {
    let spec = CommandSpec::new("lsof").args(["-a", "-p", &pid.to_string(), "-d", "cwd", "-Fn"]);
    let output = runner.run(&spec).await?;
    Ok(parse::parse_lsof_cwd(&output))
}

/// Owner, start time and full command of `pid`.
pub async fn process_details(
    runner: &dyn CommandRunner,
    pid: u32,
) -> Result<Option<ProcessDetails>, CommandError> {
    let spec = CommandSpec::new("ps").args(["-o", "user=,lstart=,args=", "-p", &pid.to_string()]);
    let output = runner.run(&spec).await?;
    Ok(parse::parse_process_details(&output))
}
