// Local git repositories: discovery with find, status with git plumbing

pub mod parse;

use crate::command::{CommandRunner, CommandSpec};
use crate::error::CommandError;
use crate::models::{GitRepoStatus, repo_display_name};
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Where and how deep to look for repositories.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub base_dirs: Vec<PathBuf>,
    pub max_depth: u32,
    pub max_repos: usize,
    /// Per base directory.
    pub dir_timeout: Duration,
    /// Repositories whose status queries run at once (four git commands each).
    pub status_concurrency: usize,
}

pub struct GitStatusRepo {
    runner: Arc<dyn CommandRunner>,
    options: ScanOptions,
}

impl GitStatusRepo {
    pub fn new(runner: Arc<dyn CommandRunner>, options: ScanOptions) -> Self {
        Self { runner, options }
    }

    /// Status of up to `max_repos` repositories, dirty ones first.
    #[instrument(skip(self), fields(repo = "git", operation = "scan_repositories"))]
    pub async fn scan_repositories(&self) -> Vec<GitRepoStatus> {
        let paths = self.discover().await;
        let runner = self.runner.as_ref();
        let mut repos: Vec<GitRepoStatus> = stream::iter(paths)
            .map(|p| async move { repo_status(runner, &p).await })
            .buffered(self.options.status_concurrency.max(1))
            .filter_map(|status| async move { status })
            .collect()
            .await;
        repos.sort_by(GitRepoStatus::attention_order);
        repos
    }

    /// Repository roots across all base dirs: deduplicated, first-seen order, capped.
    pub async fn discover(&self) -> Vec<String> {
        let mut all = Vec::new();
        for dir in &self.options.base_dirs {
            all.extend(self.find_in(dir).await);
        }
        parse::dedupe_and_cap(all, self.options.max_repos)
    }

    /// A failing or timed-out directory contributes nothing.
    async fn find_in(&self, dir: &Path) -> Vec<String> {
        let spec = CommandSpec::new("find")
            .arg(dir.to_string_lossy())
            .args([
                "-maxdepth".to_string(),
                self.options.max_depth.to_string(),
                "-type".into(),
                "d".into(),
                "-name".into(),
                ".git".into(),
            ])
            .timeout(self.options.dir_timeout);
        match self.runner.run(&spec).await {
            Ok(out) => parse::parse_find_output(&out),
            Err(e) => {
                tracing::debug!(error = %e, dir = %dir.display(), "repository search failed");
                Vec::new()
            }
        }
    }
}

/// Branch, change count and ahead/behind counts for one repository.
/// `None` drops the repository from the result.
pub async fn repo_status(runner: &dyn CommandRunner, path: &str) -> Option<GitRepoStatus> {
    let (branch, status, unpushed, behind) = tokio::join!(
        git(runner, path, &["rev-parse", "--abbrev-ref", "HEAD"]),
        git(runner, path, &["status", "--porcelain"]),
        upstream_count(runner, path, "@{u}..HEAD"),
        upstream_count(runner, path, "HEAD..@{u}"),
    );

    match assemble(path, branch, status, unpushed, behind) {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!(error = %e, path, "dropping repository");
            None
        }
    }
}

fn assemble(
    path: &str,
    branch: Result<String, CommandError>,
    status: Result<String, CommandError>,
    unpushed: Result<u32, String>,
    behind: Result<u32, String>,
) -> Result<GitRepoStatus, String> {
    let branch = branch.map_err(|e| e.to_string())?.trim().to_string();
    if branch.is_empty() {
        return Err("empty branch name".into());
    }
    let uncommitted_count = parse::count_porcelain_entries(&status.map_err(|e| e.to_string())?);
    Ok(GitRepoStatus {
        path: path.to_string(),
        name: repo_display_name(path),
        branch,
        dirty: uncommitted_count > 0,
        uncommitted_count,
        unpushed_count: unpushed?,
        behind_count: behind?,
    })
}

async fn git(runner: &dyn CommandRunner, path: &str, args: &[&str]) -> Result<String, CommandError> {
    let spec = CommandSpec::new("git")
        .args(args.iter().copied())
        .current_dir(path);
    runner.run(&spec).await
}

/// `git rev-list <range> --count`. A non-zero exit means no upstream is configured
/// and counts as 0; anything else that prevents a count is an error.
async fn upstream_count(runner: &dyn CommandRunner, path: &str, range: &str) -> Result<u32, String> {
    match git(runner, path, &["rev-list", range, "--count"]).await {
        Ok(out) => parse::parse_count(&out).ok_or_else(|| format!("unexpected count {out:?}")),
        Err(CommandError::NonZeroExit { .. }) => Ok(0),
        Err(e) => Err(e.to_string()),
    }
}
