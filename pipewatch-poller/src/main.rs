//! Pipewatch Poller
//!
//! Background service that keeps a near-real-time status view of the
//! deployment pipelines of one or more provider accounts.
//!
//! Architecture:
//! - Configuration: accounts, groups and intervals from the environment
//! - Services: per-pipeline collection and periodic status reporting
//! - Scheduler: the repeating, non-overlapping poll cycle
//!
//! The poller is the only writer of the status cache. Readers (the reporter
//! here, a rendering layer elsewhere) query it concurrently and never wait on
//! provider I/O.

mod config;
mod error;
mod scheduler;
mod service;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use pipewatch_client::HttpProviderClient;
use pipewatch_core::StatusCache;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scheduler::StatusPoller;
use crate::service::{Account, StatusReporter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch_poller=info,pipewatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pipewatch Poller");

    let config = load_config()?;
    info!(
        "Loaded configuration: {} account(s), {} group(s), poll interval {:?}, fetch timeout {:?}",
        config.accounts.len(),
        config.groups.len(),
        config.poll_interval,
        config.fetch_timeout
    );

    if config.accounts.is_empty() {
        warn!("No accounts configured, the status cache will stay empty");
    }

    let accounts = build_accounts(&config)?;
    let cache = Arc::new(StatusCache::new());

    let reporter = Arc::new(StatusReporter::new(
        Arc::clone(&cache),
        config.groups.clone(),
        config.stale_after(),
    ));
    let report_interval = config.report_interval;
    let poller = Arc::new(StatusPoller::new(config, accounts, Arc::clone(&cache)));

    tokio::spawn(reporter.run(report_interval));
    let poll_handle = tokio::spawn(poller.run());

    tokio::select! {
        result = poll_handle => {
            result.context("Poller task ended unexpectedly")?;
        }
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("Shutdown requested, {} pipeline(s) cached", cache.len());
        }
    }

    Ok(())
}

/// Loads configuration from environment variables
///
/// Falls back to defaults only when no config file is named.
fn load_config() -> Result<Config> {
    let config = match Config::from_env()? {
        Some(config) => config,
        None => {
            warn!("PIPEWATCH_CONFIG not set, using defaults");
            Config::default()
        }
    };
    config.validate()?;
    Ok(config)
}

/// Creates one provider client per configured account
fn build_accounts(config: &Config) -> Result<Vec<Account>> {
    config
        .accounts
        .iter()
        .map(|account| {
            let client = HttpProviderClient::new(account.endpoint.clone(), config.fetch_timeout)
                .with_context(|| format!("Failed to create client for account '{}'", account.name))?;
            info!("Account {} -> {}", account.name, client.base_url());
            Ok(Account::new(
                account.name.clone(),
                account.role.clone(),
                Arc::new(client),
            ))
        })
        .collect()
}
