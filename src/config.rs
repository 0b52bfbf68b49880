use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub git: GitConfig,
    pub processes: ProcessesConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed by CORS (the web UI's dev server).
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            allowed_origin: "http://localhost:5173".into(),
        }
    }
}

/// Per-collector refresh cadence. Collectors refresh independently.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub docker_interval_ms: u64,
    pub ports_interval_ms: u64,
    pub processes_interval_ms: u64,
    /// Repository scans are expensive; keep this slow.
    pub git_interval_ms: u64,
    /// Upper bound for any external command without its own timeout.
    pub command_timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            docker_interval_ms: 2_000,
            ports_interval_ms: 5_000,
            processes_interval_ms: 3_000,
            git_interval_ms: 30_000,
            command_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Base directories searched for repositories, in order. `~/` expands to the home directory.
    pub scan_dirs: Vec<String>,
    pub max_depth: u32,
    pub max_repos: usize,
    /// Per base directory.
    pub scan_timeout_secs: u64,
    /// Repositories queried at once; each runs four git commands.
    pub status_concurrency: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            scan_dirs: vec!["~/Developer".into(), "~/Projects".into()],
            max_depth: 3,
            max_repos: 50,
            scan_timeout_secs: 10,
            status_concurrency: 8,
        }
    }
}

impl GitConfig {
    /// Scan directories with `~` expanded and trailing slashes removed.
    pub fn resolved_scan_dirs(&self) -> Vec<PathBuf> {
        self.scan_dirs.iter().map(|d| expand_home(d)).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessesConfig {
    /// Substrings of a process name or command line that mark it as a dev process.
    pub patterns: Vec<String>,
    /// Data rows (header not counted) read from the CPU-sorted process listing
    /// before filtering.
    pub max_rows: usize,
    /// Per-pid cwd and owner lookups in flight at once, for processes and ports.
    pub lookup_concurrency: usize,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        Self {
            patterns: default_dev_patterns(),
            max_rows: 100,
            lookup_concurrency: 8,
        }
    }
}

pub fn default_dev_patterns() -> Vec<String> {
    [
        // JavaScript / TypeScript
        "node", "npm", "yarn", "pnpm", "vite", "webpack", "esbuild", "tsc", "next", "remix",
        // Python
        "python", "python3", "pip", "uvicorn", "gunicorn", "flask", "django",
        // Ruby
        "ruby", "rails", "bundle", "puma",
        // Rust
        "cargo", "rustc",
        // Go
        "go run", "go build",
        // JVM
        "java", "gradle", "mvn",
        // PHP
        "php", "composer", "artisan",
        // Other
        "docker", "kubectl",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// How often to log refresh counters at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: 60,
        }
    }
}

fn expand_home(dir: &str) -> PathBuf {
    let trimmed = if dir.len() > 1 {
        dir.trim_end_matches('/')
    } else {
        dir
    };
    if trimmed == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = trimmed.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(trimmed)
}

impl AppConfig {
    /// Reads `$CONFIG_FILE` (must exist when set), else `./config.toml` when present,
    /// else built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(&path),
            Err(_) if std::path::Path::new("config.toml").exists() => {
                Self::load_from_path("config.toml")
            }
            Err(_) => {
                tracing::info!("No config.toml found; using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            !self.server.allowed_origin.is_empty(),
            "server.allowed_origin must be non-empty"
        );
        for (key, value) in [
            ("polling.docker_interval_ms", self.polling.docker_interval_ms),
            ("polling.ports_interval_ms", self.polling.ports_interval_ms),
            ("polling.processes_interval_ms", self.polling.processes_interval_ms),
            ("polling.git_interval_ms", self.polling.git_interval_ms),
            ("polling.command_timeout_secs", self.polling.command_timeout_secs),
            ("git.scan_timeout_secs", self.git.scan_timeout_secs),
            (
                "monitoring.stats_log_interval_secs",
                self.monitoring.stats_log_interval_secs,
            ),
        ] {
            anyhow::ensure!(value > 0, "{} must be > 0, got {}", key, value);
        }
        anyhow::ensure!(
            self.git.max_depth > 0,
            "git.max_depth must be > 0, got {}",
            self.git.max_depth
        );
        anyhow::ensure!(
            self.git.max_repos > 0,
            "git.max_repos must be > 0, got {}",
            self.git.max_repos
        );
        anyhow::ensure!(
            self.git.status_concurrency > 0,
            "git.status_concurrency must be > 0, got {}",
            self.git.status_concurrency
        );
        anyhow::ensure!(
            self.processes.lookup_concurrency > 0,
            "processes.lookup_concurrency must be > 0, got {}",
            self.processes.lookup_concurrency
        );
        anyhow::ensure!(
            self.processes.max_rows > 0,
            "processes.max_rows must be > 0, got {}",
            self.processes.max_rows
        );
        anyhow::ensure!(
            !self.processes.patterns.is_empty(),
            "processes.patterns must be non-empty"
        );
        anyhow::ensure!(
            self.processes.patterns.iter().all(|p| !p.is_empty()),
            "processes.patterns must not contain empty patterns"
        );
        Ok(())
    }
}
