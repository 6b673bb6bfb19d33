use serde::Deserialize;
use std::time::Duration;

/// Default number of crawl workers
pub const DEFAULT_THREADS: usize = 5;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub scope: ScopeConfig,
}

/// Worker pool and run-lifetime configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub threads: usize,

    /// How long a worker waits on an empty queue before re-checking (milliseconds)
    #[serde(rename = "idle-timeout-ms")]
    pub idle_timeout_ms: u64,

    /// Wall-clock ceiling for a whole run (seconds)
    #[serde(rename = "max-run-secs")]
    pub max_run_secs: u64,

    /// Time given to workers to stop after the ceiling is hit (milliseconds)
    #[serde(rename = "shutdown-grace-ms")]
    pub shutdown_grace_ms: u64,
}

impl CrawlerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn max_run(&self) -> Duration {
        Duration::from_secs(self.max_run_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            idle_timeout_ms: 1000,
            max_run_secs: 600,
            shutdown_grace_ms: 2000,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-attempt request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Total attempts per address, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            max_attempts: 3,
            retry_delay_ms: 1000,
            user_agent: format!("scopecrawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Scope configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Domain to stay within; derived from the seed when unset
    pub domain: Option<String>,
}
