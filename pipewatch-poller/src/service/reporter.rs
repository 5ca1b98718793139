//! Status reporter
//!
//! Periodically reads the cache, builds the configured groups and logs their
//! worst status together with what is running and failing. Only reads.

use chrono::{TimeDelta, Utc};
use pipewatch_core::StatusCache;
use pipewatch_core::view::{Overview, PipelineGroup};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::GroupConfig;
use crate::scheduler::RepeatingTask;

pub struct StatusReporter {
    cache: Arc<StatusCache>,
    groups: Vec<GroupConfig>,
    /// Summaries older than this are flagged as stale
    stale_after: TimeDelta,
}

impl StatusReporter {
    pub fn new(cache: Arc<StatusCache>, groups: Vec<GroupConfig>, stale_after: Duration) -> Self {
        Self {
            cache,
            groups,
            stale_after: TimeDelta::from_std(stale_after).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Groups in configured order, built from the current cache contents
    pub fn build_groups(&self) -> Vec<PipelineGroup> {
        self.groups
            .iter()
            .map(|group| self.cache.group(&group.name, group.pipelines.as_slice()))
            .collect()
    }

    /// Logs one status line per group plus overview counts
    pub fn report(&self) {
        let groups = self.build_groups();
        let overview = Overview::new(&groups);
        let now = Utc::now();

        for group in overview.groups() {
            info!(
                group = group.name(),
                "{} pipeline(s), status {}",
                group.pipelines().len(),
                group.status()
            );
        }

        for pipeline in overview.failing_pipelines() {
            warn!(
                "{} failed in {}: {}",
                pipeline.name,
                pipeline.first_failing_stage_name.as_deref().unwrap_or("unknown stage"),
                pipeline.short_error_message().unwrap_or_default()
            );
        }

        let stale: Vec<_> = self
            .cache
            .all()
            .into_values()
            .filter(|pipeline| pipeline.age(now) > self.stale_after)
            .map(|pipeline| pipeline.name.clone())
            .collect();
        if !stale.is_empty() {
            warn!("{} stale pipeline(s): {}", stale.len(), stale.join(", "));
        }

        info!(
            "{} cached, {} running, {} failing",
            self.cache.len(),
            overview.running_pipelines().len(),
            overview.failing_pipelines().len()
        );
    }

    /// Reports on a fixed interval until the process exits
    pub async fn run(self: Arc<Self>, interval: Duration) {
        let timer = RepeatingTask::new("status report", interval);
        timer
            .run(move || {
                let reporter = Arc::clone(&self);
                async move { reporter.report() }
            })
            .await;
    }
}
