// Listening TCP ports via lsof, enriched with owner process details

pub mod parse;

use crate::command::{CommandRunner, CommandSpec};
use crate::enrich::enrich;
use crate::error::{CollectError, CommandError};
use crate::models::{ListeningPort, ProcessDetails};
use crate::process_repo::{DEFAULT_LOOKUP_CONCURRENCY, process_details, working_dir};
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

pub struct PortsRepo {
    runner: Arc<dyn CommandRunner>,
    lookup_concurrency: usize,
}

#[derive(Debug, Default)]
struct OwnerInfo {
    cwd: Option<String>,
    details: Option<ProcessDetails>,
}

impl PortsRepo {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Owner lookups in flight at once; each runs lsof then ps.
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    /// Listening ports sorted by number, or an empty list when lsof cannot run.
    pub async fn list_listening_ports(&self) -> Vec<ListeningPort> {
        self.collect().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, operation = "list_listening_ports", "port listing failed");
            Vec::new()
        })
    }

    /// Like [`Self::list_listening_ports`] but reports a failed listing.
    #[instrument(skip(self), fields(repo = "ports", operation = "collect"))]
    pub async fn collect(&self) -> Result<Vec<ListeningPort>, CollectError> {
        let spec = CommandSpec::new("lsof").args(["-iTCP", "-sTCP:LISTEN", "-P", "-n"]);
        let output = match self.runner.run(&spec).await {
            Ok(out) => out,
            // lsof exits 1 without output when nothing matches
            Err(CommandError::NonZeroExit { code: 1, stderr }) if stderr.is_empty() => {
                String::new()
            }
            Err(e) => return Err(CollectError::command("lsof", e)),
        };

        let mut ports = parse::parse_lsof_listen(&output).into_records("lsof listen");
        let owners = self.owner_info(&ports).await;
        for port in &mut ports {
            if let Some(info) = owners.get(&port.pid) {
                port.cwd = info.cwd.clone();
                if let Some(d) = &info.details {
                    port.user = Some(d.user.clone());
                    port.start_time = d.start_time.clone();
                    port.command = Some(d.command.clone());
                }
            }
        }
        Ok(ports)
    }

    /// One cwd + details lookup per distinct pid.
    async fn owner_info(&self, ports: &[ListeningPort]) -> HashMap<u32, OwnerInfo> {
        let mut pids: Vec<u32> = ports.iter().map(|p| p.pid).collect();
        pids.sort_unstable();
        pids.dedup();

        let runner = self.runner.as_ref();
        let infos: Vec<(u32, OwnerInfo)> = stream::iter(pids)
            .map(|pid| async move {
                let info = enrich(
                    OwnerInfo::default(),
                    "port owner cwd",
                    working_dir(runner, pid),
                    |i, cwd| i.cwd = cwd,
                )
                .await;
                let info = enrich(
                    info,
                    "port owner details",
                    process_details(runner, pid),
                    |i, details| i.details = details,
                )
                .await;
                (pid, info)
            })
            .buffer_unordered(self.lookup_concurrency)
            .collect()
            .await;
        infos.into_iter().collect()
    }
}
