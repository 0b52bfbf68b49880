// Snapshot store and the per-collector refresh loops.
// Each collector refreshes on its own interval and on demand; a slow collector only
// delays itself. Results are published per collector, replacing the previous slot.

use crate::config::AppConfig;
use crate::docker_repo::DockerRepo;
use crate::git_repo::GitStatusRepo;
use crate::models::{
    CollectorSlot, ContainerRecord, DevProcess, GitRepoStatus, ListeningPort, Snapshot,
};
use crate::ports_repo::PortsRepo;
use crate::process_repo::ProcessRepo;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval, interval_at};
use tracing::Instrument;

/// Owns the current [`Snapshot`]. Writers replace one collector slot at a time;
/// readers get cheap clones and never see a half-written slot.
#[derive(Default)]
pub struct SnapshotStore {
    inner: RwLock<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }

    pub async fn containers(&self) -> CollectorSlot<ContainerRecord> {
        self.inner.read().await.containers.clone()
    }

    pub async fn ports(&self) -> CollectorSlot<ListeningPort> {
        self.inner.read().await.ports.clone()
    }

    pub async fn processes(&self) -> CollectorSlot<DevProcess> {
        self.inner.read().await.processes.clone()
    }

    pub async fn git(&self) -> CollectorSlot<GitRepoStatus> {
        self.inner.read().await.git.clone()
    }

    pub async fn publish_containers(&self, result: Result<Vec<ContainerRecord>, String>) {
        self.update(|s| &mut s.containers, result).await;
    }

    pub async fn publish_ports(&self, result: Result<Vec<ListeningPort>, String>) {
        self.update(|s| &mut s.ports, result).await;
    }

    pub async fn publish_processes(&self, result: Result<Vec<DevProcess>, String>) {
        self.update(|s| &mut s.processes, result).await;
    }

    pub async fn publish_git(&self, result: Result<Vec<GitRepoStatus>, String>) {
        self.update(|s| &mut s.git, result).await;
    }

    /// Success replaces the items; failure keeps the last good items and records the error.
    async fn update<T>(
        &self,
        select: impl FnOnce(&mut Snapshot) -> &mut CollectorSlot<T>,
        result: Result<Vec<T>, String>,
    ) {
        let now = now_ms();
        let mut guard = self.inner.write().await;
        let slot = select(&mut *guard);
        *slot = match result {
            Ok(items) => slot.published(items, now),
            Err(e) => slot.failed(e, now),
        };
    }
}

/// Which collector a refresh loop drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    Docker,
    Ports,
    Processes,
    Git,
}

impl Collector {
    pub const ALL: [Collector; 4] = [
        Collector::Docker,
        Collector::Ports,
        Collector::Processes,
        Collector::Git,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collector::Docker => "docker",
            Collector::Ports => "ports",
            Collector::Processes => "processes",
            Collector::Git => "git",
        }
    }
}

/// Refresh cadence per collector plus the stats log interval.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub docker: Duration,
    pub ports: Duration,
    pub processes: Duration,
    pub git: Duration,
    pub stats_log_interval: Duration,
}

impl RefreshConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            docker: Duration::from_millis(config.polling.docker_interval_ms),
            ports: Duration::from_millis(config.polling.ports_interval_ms),
            processes: Duration::from_millis(config.polling.processes_interval_ms),
            git: Duration::from_millis(config.polling.git_interval_ms),
            stats_log_interval: Duration::from_secs(config.monitoring.stats_log_interval_secs),
        }
    }

    fn interval_for(&self, collector: Collector) -> Duration {
        match collector {
            Collector::Docker => self.docker,
            Collector::Ports => self.ports,
            Collector::Processes => self.processes,
            Collector::Git => self.git,
        }
    }
}

/// The four collectors the aggregator drives.
pub struct AggregatorDeps {
    pub docker: Arc<DockerRepo>,
    pub ports: Arc<PortsRepo>,
    pub processes: Arc<ProcessRepo>,
    pub git: Arc<GitStatusRepo>,
}

pub struct Aggregator {
    docker: Arc<DockerRepo>,
    ports: Arc<PortsRepo>,
    processes: Arc<ProcessRepo>,
    git: Arc<GitStatusRepo>,
    store: Arc<SnapshotStore>,
    /// Generation counter; bumping it wakes every refresh loop.
    refresh_tx: watch::Sender<u64>,
}

impl Aggregator {
    pub fn new(deps: AggregatorDeps) -> Self {
        let (refresh_tx, _) = watch::channel(0);
        Self {
            docker: deps.docker,
            ports: deps.ports,
            processes: deps.processes,
            git: deps.git,
            store: Arc::new(SnapshotStore::new()),
            refresh_tx,
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn docker(&self) -> &Arc<DockerRepo> {
        &self.docker
    }

    pub fn processes(&self) -> &Arc<ProcessRepo> {
        &self.processes
    }

    /// Asks every refresh loop to run now instead of waiting for its next tick.
    pub fn request_refresh(&self) {
        self.refresh_tx.send_modify(|generation| *generation += 1);
    }

    /// Current refresh generation (number of refresh requests so far).
    pub fn refresh_generation(&self) -> u64 {
        *self.refresh_tx.borrow()
    }

    /// Runs all four collectors concurrently; each publishes as soon as it finishes.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.refresh(Collector::Docker),
            self.refresh(Collector::Ports),
            self.refresh(Collector::Processes),
            self.refresh(Collector::Git),
        );
    }

    pub async fn refresh(&self, collector: Collector) {
        match collector {
            Collector::Docker => {
                let result = self.docker.list_containers().await.map_err(|e| e.to_string());
                log_failure(collector, &result);
                self.store.publish_containers(result).await;
            }
            Collector::Ports => {
                let result = self.ports.collect().await.map_err(|e| e.to_string());
                log_failure(collector, &result);
                self.store.publish_ports(result).await;
            }
            Collector::Processes => {
                let result = self.processes.collect().await.map_err(|e| e.to_string());
                log_failure(collector, &result);
                self.store.publish_processes(result).await;
            }
            Collector::Git => {
                let repos = self.git.scan_repositories().await;
                self.store.publish_git(Ok(repos)).await;
            }
        }
    }

    /// Starts one refresh loop per collector and a stats logger. All stop when
    /// `shutdown` flips (or its sender is dropped); the returned handle completes then.
    pub fn spawn(
        self: &Arc<Self>,
        config: RefreshConfig,
        shutdown: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let mut handles: Vec<_> = Collector::ALL
            .into_iter()
            .map(|c| self.spawn_loop(c, config.interval_for(c), shutdown.clone()))
            .collect();
        handles.push(self.spawn_stats_logger(config.stats_log_interval, shutdown));

        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "refresh loop ended abnormally");
                }
            }
            tracing::debug!("Refresh loops stopped");
        })
    }

    fn spawn_loop(
        self: &Arc<Self>,
        collector: Collector,
        every: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let aggregator = Arc::clone(self);
        let mut refresh_rx = self.refresh_tx.subscribe();
        let span = tracing::debug_span!("refresh_loop", collector = collector.name());

        tokio::spawn(
            async move {
                // first tick one period out; startup does its own initial refresh
                let mut tick = interval_at(Instant::now() + every, every);
                tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            aggregator.refresh(collector).await;
                        }
                        changed = refresh_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            aggregator.refresh(collector).await;
                            tick.reset();
                        }
                        _ = shutdown.changed() => {
                            tracing::debug!("Refresh loop shutting down");
                            break;
                        }
                    }
                }
            }
            .instrument(span),
        )
    }

    fn spawn_stats_logger(
        self: &Arc<Self>,
        every: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let mut tick = interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let s = store.snapshot().await;
                        tracing::info!(
                            containers = s.containers.items.len(),
                            ports = s.ports.items.len(),
                            processes = s.processes.items.len(),
                            git_repos = s.git.items.len(),
                            docker_failures = s.containers.status.failure_count,
                            ports_failures = s.ports.status.failure_count,
                            processes_failures = s.processes.status.failure_count,
                            "app stats"
                        );
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }
}

fn log_failure<T>(collector: Collector, result: &Result<T, String>) {
    if let Err(e) = result {
        tracing::warn!(
            error = %e,
            collector = collector.name(),
            operation = "refresh",
            "collector refresh failed"
        );
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
