//! Status poller
//!
//! Walks every account and pipeline on each cycle and writes the rebuilt
//! summaries into the status cache. A failure is contained to the pipeline
//! (or account listing) it happened in: it is logged, the cache keeps the
//! previous summary, and the cycle moves on.

use pipewatch_core::StatusCache;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::timer::RepeatingTask;
use crate::config::Config;
use crate::service::{Account, PipelineCollector};

/// Outcome counts of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Summaries published to the cache
    pub updated: usize,
    /// Pipelines left stale because of an error
    pub failed: usize,
    /// Accounts whose pipelines could not be listed
    pub failed_accounts: usize,
}

/// Poller that refreshes the status cache from every account
pub struct StatusPoller {
    config: Config,
    accounts: Vec<Account>,
    cache: Arc<StatusCache>,
    collector: PipelineCollector,
}

impl StatusPoller {
    /// Creates a new status poller
    ///
    /// # Arguments
    /// * `config` - Intervals and timeouts
    /// * `accounts` - Accounts in polling order
    /// * `cache` - Cache this poller is the only writer of
    pub fn new(config: Config, accounts: Vec<Account>, cache: Arc<StatusCache>) -> Self {
        let collector = PipelineCollector::new(config.fetch_timeout);
        Self {
            config,
            accounts,
            cache,
            collector,
        }
    }

    /// Starts the polling loop
    ///
    /// The first cycle starts immediately; later triggers that fire while a
    /// cycle is still running are skipped.
    pub async fn run(self: Arc<Self>) {
        info!(
            "Starting status poller (interval: {:?}, accounts: {})",
            self.config.poll_interval,
            self.accounts.len()
        );

        let timer = RepeatingTask::new("poll cycle", self.config.poll_interval);
        timer
            .run(move || {
                let poller = Arc::clone(&self);
                async move {
                    poller.poll_once().await;
                }
            })
            .await;
    }

    /// Performs a single poll cycle across all accounts
    pub async fn poll_once(&self) -> CycleReport {
        let started = Instant::now();
        let mut report = CycleReport::default();

        for account in &self.accounts {
            self.poll_account(account, &mut report).await;
        }

        info!(
            "Poll cycle finished in {:?}: {} updated, {} failed, {} account(s) unreachable",
            started.elapsed(),
            report.updated,
            report.failed,
            report.failed_accounts
        );

        report
    }

    async fn poll_account(&self, account: &Account, report: &mut CycleReport) {
        let pipelines = match self.collector.list_pipelines(account).await {
            Ok(pipelines) => pipelines,
            Err(e) => {
                warn!(account = %account.name, "Error listing pipelines: {}", e);
                report.failed_accounts += 1;
                return;
            }
        };

        debug!("Account {} has {} pipeline(s)", account.name, pipelines.len());

        for pipeline in &pipelines {
            match self.collector.collect(account, pipeline).await {
                Ok(view) => {
                    self.cache.put(view);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!(account = %account.name, "Error processing pipeline {}: {}", pipeline, e);
                    report.failed += 1;
                }
            }
        }
    }
}
