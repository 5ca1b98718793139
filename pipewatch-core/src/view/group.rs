//! Pipeline groups

use std::sync::Arc;

use super::summary::PipelineSummaryView;
use crate::domain::status::ExecutionStatus;

/// Status reported for a group with no members
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Named, ordered set of pipeline summaries
#[derive(Debug, Clone)]
pub struct PipelineGroup {
    name: String,
    pipelines: Vec<Arc<PipelineSummaryView>>,
}

impl PipelineGroup {
    pub fn new(name: impl Into<String>, pipelines: Vec<Arc<PipelineSummaryView>>) -> Self {
        Self {
            name: name.into(),
            pipelines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipelines(&self) -> &[Arc<PipelineSummaryView>] {
        &self.pipelines
    }

    /// Status of the worst member; the first one wins on ties
    pub fn worst_status(&self) -> Option<&ExecutionStatus> {
        self.pipelines
            .iter()
            .map(|pipeline| &pipeline.status)
            .min_by_key(|status| status.rank())
    }

    /// Worst member status, or `"Unknown"` for an empty group
    pub fn status(&self) -> String {
        self.worst_status()
            .map(ToString::to_string)
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string())
    }
}
