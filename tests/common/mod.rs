// Shared test helpers: a scripted command runner and repo wiring

#![allow(dead_code)]

use async_trait::async_trait;
use devboard::aggregator::{Aggregator, AggregatorDeps};
use devboard::command::{CommandRunner, CommandSpec};
use devboard::config::default_dev_patterns;
use devboard::docker_repo::DockerRepo;
use devboard::error::CommandError;
use devboard::git_repo::{GitStatusRepo, ScanOptions};
use devboard::ports_repo::PortsRepo;
use devboard::process_repo::ProcessRepo;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned outcome for a matched command.
#[derive(Debug, Clone)]
pub enum Reply {
    Stdout(String),
    NotFound,
    Exit { code: i32, stderr: String },
    Timeout,
}

impl Reply {
    pub fn stdout(s: &str) -> Self {
        Reply::Stdout(s.to_string())
    }

    pub fn exit(code: i32, stderr: &str) -> Self {
        Reply::Exit {
            code,
            stderr: stderr.to_string(),
        }
    }

    fn to_result(&self, program: &str) -> Result<String, CommandError> {
        match self {
            Reply::Stdout(s) => Ok(s.clone()),
            Reply::NotFound => Err(CommandError::NotFound(program.to_string())),
            Reply::Exit { code, stderr } => Err(CommandError::NonZeroExit {
                code: *code,
                stderr: stderr.clone(),
            }),
            Reply::Timeout => Err(CommandError::Timeout(Duration::from_secs(1))),
        }
    }
}

struct Rule {
    prefix: String,
    dir: Option<PathBuf>,
    reply: Reply,
}

/// Answers commands by the first rule whose prefix matches `program args...`
/// (and whose directory matches, when given). Unmatched commands are NotFound.
/// Every invocation is recorded, along with the most calls ever in flight at once.
#[derive(Default)]
pub struct StubRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CommandSpec>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering (tokio time, so pausable).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn on(self, prefix: &str, reply: Reply) -> Self {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            dir: None,
            reply,
        });
        self
    }

    pub fn on_in(self, dir: &str, prefix: &str, reply: Reply) -> Self {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            dir: Some(PathBuf::from(dir)),
            reply,
        });
        self
    }

    /// Adds a rule that takes precedence over the existing ones.
    pub fn push(&self, prefix: &str, reply: Reply) {
        self.rules.lock().unwrap().insert(
            0,
            Rule {
                prefix: prefix.to_string(),
                dir: None,
                reply,
            },
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.display()).collect()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.answer(spec);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl StubRunner {
    fn answer(&self, spec: &CommandSpec) -> Result<String, CommandError> {
        let line = spec.display();
        let rules = self.rules.lock().unwrap();
        rules
            .iter()
            .find(|r| {
                line.starts_with(&r.prefix)
                    && r.dir.as_ref().is_none_or(|d| spec.current_dir.as_ref() == Some(d))
            })
            .map(|r| r.reply.to_result(&spec.program))
            .unwrap_or_else(|| Err(CommandError::NotFound(spec.program.clone())))
    }
}

pub fn scan_options(base_dirs: &[&str], max_repos: usize) -> ScanOptions {
    ScanOptions {
        base_dirs: base_dirs.iter().map(PathBuf::from).collect(),
        max_depth: 3,
        max_repos,
        dir_timeout: Duration::from_secs(5),
        status_concurrency: 8,
    }
}

/// Aggregator with every collector backed by the same stub.
pub fn aggregator_with(runner: Arc<StubRunner>) -> Arc<Aggregator> {
    let runner: Arc<dyn CommandRunner> = runner;
    Arc::new(Aggregator::new(AggregatorDeps {
        docker: Arc::new(DockerRepo::new(runner.clone())),
        ports: Arc::new(PortsRepo::new(runner.clone())),
        processes: Arc::new(ProcessRepo::new(runner.clone(), default_dev_patterns(), 100)),
        git: Arc::new(GitStatusRepo::new(runner, scan_options(&["/work"], 50))),
    }))
}

pub const DOCKER_PS: &str = "\
abc123def456|web|nginx:latest|Up 2 hours|running|0.0.0.0:8080->80/tcp, :::8080->80/tcp|2026-10-01 10:00:00 +0000 UTC
fed654cba321|db|postgres:16|Exited (0) 3 days ago|exited||2026-09-28 08:30:00 +0000 UTC
";

pub const DOCKER_STATS: &str = "abc123def456|0.50%|50MiB / 512MiB\n";

pub const PS_LISTING: &str = "\
  PID %CPU %MEM COMMAND         COMMAND
  101 12.5  1.2 node            node /home/dev/app/server.js
  202  3.0  0.8 python3         python3 -m http.server 8000
  303  1.0  0.5 Finder          /System/Library/CoreServices/Finder.app/Contents/MacOS/Finder
";

pub const LSOF_LISTEN: &str = "\
COMMAND   PID USER   FD   TYPE  DEVICE SIZE/OFF NODE NAME
node      101 dev    23u  IPv4  0x1234      0t0  TCP *:3000 (LISTEN)
node      101 dev    24u  IPv6  0x1235      0t0  TCP *:3000 (LISTEN)
postgres  411 dev     5u  IPv4  0x5678      0t0  TCP 127.0.0.1:5432 (LISTEN)
";
