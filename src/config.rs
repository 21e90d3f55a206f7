use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_EXTENSIONS: &[&str] = &["svg", "txt", "xml", "json", "css", "html"];
const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;
const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
const DEFAULT_JOB_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Resolved runtime configuration, merged from CLI flags, an optional
/// config file, and built-in defaults (in that precedence order).
#[derive(Debug, Clone)]
pub struct ReplacerConfig {
    pub workspace_root: PathBuf,
    pub supported_extensions: Vec<String>,
    pub max_file_bytes: u64,
    pub max_concurrent_jobs: usize,
    pub job_ttl_secs: u64,
    pub cache_capacity: usize,
}

impl ReplacerConfig {
    pub fn from_args(args: ConfigArgs) -> Result<Self> {
        let ConfigArgs {
            config,
            workspace_root: cli_workspace_root,
            extensions: cli_extensions,
            max_file_bytes: cli_max_file_bytes,
            max_concurrent_jobs: cli_max_concurrent_jobs,
            job_ttl_secs: cli_job_ttl_secs,
            cache_capacity: cli_cache_capacity,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            workspace_root: file_workspace_root,
            extensions: file_extensions,
            max_file_bytes: file_max_file_bytes,
            max_concurrent_jobs: file_max_concurrent_jobs,
            job_ttl_secs: file_job_ttl_secs,
            cache_capacity: file_cache_capacity,
        } = file_config;

        let workspace_root = cli_workspace_root
            .or(file_workspace_root)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut supported_extensions = cli_extensions
            .or(file_extensions)
            .unwrap_or_else(|| {
                DEFAULT_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect()
            })
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect::<Vec<_>>();

        supported_extensions.sort();
        supported_extensions.dedup();

        anyhow::ensure!(
            !supported_extensions.is_empty(),
            "at least one file extension must be provided"
        );

        let max_file_bytes = cli_max_file_bytes
            .or(file_max_file_bytes)
            .unwrap_or(DEFAULT_MAX_FILE_BYTES)
            .max(1);

        let max_concurrent_jobs = cli_max_concurrent_jobs
            .or(file_max_concurrent_jobs)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_JOBS)
            .max(1);

        let job_ttl_secs = cli_job_ttl_secs
            .or(file_job_ttl_secs)
            .unwrap_or(DEFAULT_JOB_TTL_SECS)
            .max(1);

        let cache_capacity = cli_cache_capacity
            .or(file_cache_capacity)
            .unwrap_or(DEFAULT_CACHE_CAPACITY)
            .max(1);

        Ok(Self {
            workspace_root,
            supported_extensions,
            max_file_bytes,
            max_concurrent_jobs,
            job_ttl_secs,
            cache_capacity,
        })
    }

    pub fn ensure_workspace_root(&self) -> Result<()> {
        anyhow::ensure!(
            self.workspace_root.exists(),
            "workspace root {:?} does not exist",
            self.workspace_root
        );
        anyhow::ensure!(
            self.workspace_root.is_dir(),
            "workspace root {:?} is not a directory",
            self.workspace_root
        );
        Ok(())
    }

    /// Resolve a user-supplied path: absolute paths pass through, relative
    /// paths land under the workspace root.
    pub fn resolve_user_path<P: AsRef<Path>>(&self, p: P) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.workspace_root.join(p)
        }
    }

    pub fn job_ttl(&self) -> Duration {
        Duration::from_secs(self.job_ttl_secs)
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "FILE_REPLACE_WORKSPACE",
        value_name = "DIR",
        help = "Workspace root containing replaceable files",
        global = true
    )]
    pub workspace_root: Option<PathBuf>,

    #[arg(
        long,
        env = "FILE_REPLACE_EXTENSIONS",
        value_name = "EXT",
        value_delimiter = ',',
        help = "Comma-separated list of allowed file extensions",
        global = true
    )]
    pub extensions: Option<Vec<String>>,

    #[arg(
        long,
        env = "FILE_REPLACE_MAX_FILE_BYTES",
        value_name = "BYTES",
        help = "Largest file the engine will load (default: 16777216)",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub max_file_bytes: Option<u64>,

    #[arg(
        long,
        env = "FILE_REPLACE_MAX_CONCURRENT_JOBS",
        value_name = "N",
        help = "Max replacement jobs running at once (default: 4)",
        value_parser = clap::value_parser!(usize),
        global = true
    )]
    pub max_concurrent_jobs: Option<usize>,

    #[arg(
        long,
        env = "FILE_REPLACE_JOB_TTL_SECS",
        value_name = "SECS",
        help = "Seconds finished jobs stay visible to status polls (default: 3600)",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub job_ttl_secs: Option<u64>,

    #[arg(
        long,
        env = "FILE_REPLACE_CACHE_CAPACITY",
        value_name = "N",
        help = "Maximum number of documents kept in memory (default: 8)",
        value_parser = clap::value_parser!(usize),
        global = true
    )]
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    workspace_root: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    max_file_bytes: Option<u64>,
    max_concurrent_jobs: Option<usize>,
    job_ttl_secs: Option<u64>,
    cache_capacity: Option<usize>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
