use anyhow::Result;
use devboard::aggregator::{Aggregator, AggregatorDeps, RefreshConfig};
use devboard::command::{CommandRunner, SystemRunner};
use devboard::dispatcher::Dispatcher;
use devboard::docker_repo::DockerRepo;
use devboard::git_repo::{GitStatusRepo, ScanOptions};
use devboard::ports_repo::PortsRepo;
use devboard::process_repo::ProcessRepo;
use devboard::{config, routes};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new(Duration::from_secs(
        app_config.polling.command_timeout_secs,
    )));
    let aggregator = Arc::new(Aggregator::new(AggregatorDeps {
        docker: Arc::new(DockerRepo::new(runner.clone())),
        ports: Arc::new(
            PortsRepo::new(runner.clone())
                .with_lookup_concurrency(app_config.processes.lookup_concurrency),
        ),
        processes: Arc::new(
            ProcessRepo::new(
                runner.clone(),
                app_config.processes.patterns.clone(),
                app_config.processes.max_rows,
            )
            .with_lookup_concurrency(app_config.processes.lookup_concurrency),
        ),
        git: Arc::new(GitStatusRepo::new(
            runner,
            ScanOptions {
                base_dirs: app_config.git.resolved_scan_dirs(),
                max_depth: app_config.git.max_depth,
                max_repos: app_config.git.max_repos,
                dir_timeout: Duration::from_secs(app_config.git.scan_timeout_secs),
                status_concurrency: app_config.git.status_concurrency,
            },
        )),
    }));
    let dispatcher = Arc::new(Dispatcher::new(aggregator.clone()));

    aggregator.refresh_all().await;
    tracing::info!("Initial refresh complete");

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let loops_handle = aggregator.spawn(RefreshConfig::from_app_config(&app_config), shutdown_rx);

    let app = routes::app(aggregator, dispatcher, &app_config.server.allowed_origin)?;
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = loops_handle.await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
