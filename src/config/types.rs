use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent by default; some sites block obvious bot agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Default `accept` header value
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Default `accept-language` preference list
pub const DEFAULT_ACCEPT_LANGUAGE: &str =
    "en-US,en;q=0.9,fr-FR;q=0.8,fr;q=0.7,es-US;q=0.6,es;q=0.5,it-IT;q=0.4,it;q=0.3";

/// Main configuration structure for the scanner
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub http: HttpConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawl session behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScannerConfig {
    /// Deepest link level that is still fetched (the seed's home page is depth 0)
    pub max_depth: u32,

    /// Number of concurrent workers sharing one session's frontier
    pub workers_per_session: usize,

    /// Number of seed sessions running at the same time
    pub concurrent_sessions: usize,

    /// How long a session slot waits for the next seed before polling again (seconds)
    pub seed_wait_secs: u64,
}

impl ScannerConfig {
    pub fn seed_wait(&self) -> Duration {
        Duration::from_secs(self.seed_wait_secs)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            workers_per_session: 20,
            concurrent_sessions: 5,
            seed_wait_secs: 5,
        }
    }
}

/// Fixed request header profile and transport limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Redirect hops followed before the fetch counts as failed
    pub max_redirects: usize,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_secs: 5,
            max_redirects: 10,
        }
    }
}

/// Seed source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InputConfig {
    /// Text file with one seed URL per line
    pub seeds_file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            seeds_file: PathBuf::from("input.txt"),
        }
    }
}

/// Outcome table configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory holding both outcome tables
    pub data_dir: PathBuf,

    /// File name of the reached-page table
    pub reached_file: String,

    /// File name of the broken-page table
    pub broken_file: String,

    /// Records buffered per outcome channel before publishers wait
    pub channel_capacity: usize,
}

impl OutputConfig {
    pub fn reached_path(&self) -> PathBuf {
        self.data_dir.join(&self.reached_file)
    }

    pub fn broken_path(&self) -> PathBuf {
        self.data_dir.join(&self.broken_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            reached_file: "URL_TIMESTAMP.csv".to_string(),
            broken_file: "BROKEN_URL_TIMESTAMP.csv".to_string(),
            channel_capacity: 1024,
        }
    }
}
