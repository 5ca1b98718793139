//! Poller configuration
//!
//! Defines the accounts to watch, the pipeline groups to report on, and the
//! polling, timeout and reporting intervals.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use std::env::VarError;
use std::path::Path;
use std::time::Duration;

/// Summaries not refreshed for this many poll intervals are stale
const STALE_AFTER_CYCLES: u32 = 3;

/// One provider account to poll
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountConfig {
    /// Name used in logs
    pub name: String,

    /// Provider endpoint for this account (e.g., a signing proxy)
    pub endpoint: String,

    /// Opaque display tag attached to every summary of this account
    #[serde(default)]
    pub role: Option<String>,
}

/// Named, ordered list of pipelines reported together
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub pipelines: Vec<String>,
}

/// Contents of the JSON file named by `PIPEWATCH_CONFIG`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Poller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Accounts in polling order
    pub accounts: Vec<AccountConfig>,

    /// Groups in reporting order
    pub groups: Vec<GroupConfig>,

    /// How often a poll cycle is triggered
    pub poll_interval: Duration,

    /// Upper bound for a single provider call
    pub fetch_timeout: Duration,

    /// How often group statuses are logged
    pub report_interval: Duration,
}

impl Config {
    /// Creates a configuration with default intervals
    pub fn new(accounts: Vec<AccountConfig>, groups: Vec<GroupConfig>) -> Self {
        Self {
            accounts,
            groups,
            poll_interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(10),
            report_interval: Duration::from_secs(60),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Returns `Ok(None)` when `PIPEWATCH_CONFIG` is not set. A set path that
    /// cannot be read or parsed is an error.
    ///
    /// Expected environment variables:
    /// - PIPEWATCH_CONFIG (required unless running on defaults, path to the accounts/groups JSON file)
    /// - POLL_INTERVAL (optional, seconds, default: 30)
    /// - FETCH_TIMEOUT (optional, seconds, default: 10)
    /// - REPORT_INTERVAL (optional, seconds, default: 60)
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let path = match std::env::var("PIPEWATCH_CONFIG") {
            Ok(path) => path,
            Err(VarError::NotPresent) => return Ok(None),
            Err(e) => return Err(e).context("Invalid PIPEWATCH_CONFIG"),
        };

        let mut config = Self::from_file(Path::new(&path))?;

        if let Some(interval) = seconds_from_env("POLL_INTERVAL") {
            config.poll_interval = interval;
        }
        if let Some(timeout) = seconds_from_env("FETCH_TIMEOUT") {
            config.fetch_timeout = timeout;
        }
        if let Some(interval) = seconds_from_env("REPORT_INTERVAL") {
            config.report_interval = interval;
        }

        Ok(Some(config))
    }

    /// Creates a configuration with default intervals from a JSON file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = FileConfig::load(path)?;
        Ok(Self::new(file.accounts, file.groups))
    }

    /// Age after which a cached summary counts as stale
    pub fn stale_after(&self) -> Duration {
        self.poll_interval
            .checked_mul(STALE_AFTER_CYCLES)
            .unwrap_or(Duration::MAX)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.fetch_timeout.is_zero() {
            anyhow::bail!("fetch_timeout must be greater than 0");
        }

        if self.report_interval.is_zero() {
            anyhow::bail!("report_interval must be greater than 0");
        }

        let mut names = HashSet::new();
        for account in &self.accounts {
            if account.name.trim().is_empty() {
                anyhow::bail!("account name cannot be empty");
            }

            if !account.endpoint.starts_with("http://") && !account.endpoint.starts_with("https://")
            {
                anyhow::bail!(
                    "endpoint of account '{}' must start with http:// or https://",
                    account.name
                );
            }

            if !names.insert(account.name.as_str()) {
                anyhow::bail!("account '{}' is configured more than once", account.name);
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl FileConfig {
    /// Reads and parses the JSON configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

fn seconds_from_env(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
