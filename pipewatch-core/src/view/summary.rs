//! Pipeline summary view
//!
//! Composes the stage and revision views with execution-level data into the
//! single record the cache stores per pipeline.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::revision::ArtifactRevisionView;
use super::stage::StageView;
use crate::domain::pipeline::{PipelineExecution, PipelineState};
use crate::domain::status::ExecutionStatus;

/// Default number of characters shown before an error message is cut
pub const DEFAULT_MESSAGE_LIMIT: usize = 25;

/// Latest execution of one pipeline, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummaryView {
    pub name: String,
    pub execution_id: String,
    pub last_started_at: DateTime<Utc>,
    /// When this view was built; the age of a cached view shows staleness
    pub refreshed_at: DateTime<Utc>,
    pub status: ExecutionStatus,
    /// Display tag of the account the pipeline belongs to
    pub role: Option<String>,
    pub paused: bool,
    pub variables: BTreeMap<String, String>,
    pub artifacts: Vec<ArtifactRevisionView>,
    pub stages: Vec<StageView>,
    #[serde(serialize_with = "serialize_seconds")]
    pub running_duration: Option<TimeDelta>,
    pub current_stage_name: Option<String>,
    pub first_failing_stage_name: Option<String>,
    pub first_failing_stage_error_message: Option<String>,
}

impl PipelineSummaryView {
    /// Builds a complete summary for the given state and execution
    ///
    /// # Arguments
    /// * `state` - Current stage states of the pipeline
    /// * `execution` - Detail of the most recently started execution
    /// * `started_at` - Start time of that execution
    pub fn build(
        state: &PipelineState,
        execution: &PipelineExecution,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self::build_at(state, execution, started_at, Utc::now())
    }

    /// Same as [`build`](Self::build) with an explicit clock reading
    pub fn build_at(
        state: &PipelineState,
        execution: &PipelineExecution,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let execution_id = execution.pipeline_execution_id.as_str();
        let status = execution.status.clone();

        let variables = execution
            .variables
            .iter()
            .flatten()
            .map(|variable| (variable.name.clone(), variable.resolved_value.clone()))
            .collect();

        let (running_duration, current_stage_name) = if status.is_running() {
            let current = state
                .stage_states
                .iter()
                .find(|stage| {
                    stage.execution_id() == Some(execution_id)
                        && stage.status() == Some(&ExecutionStatus::InProgress)
                })
                .map(|stage| stage.stage_name.clone());
            (Some(now - started_at), current)
        } else {
            (None, None)
        };

        let (first_failing_stage_name, first_failing_stage_error_message) = if status.is_failed() {
            match state.stage_states.iter().find(|stage| stage.is_failed()) {
                Some(stage) => (
                    Some(stage.stage_name.clone()),
                    stage.failed_action_message().map(str::to_string),
                ),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        Self {
            name: state.pipeline_name.clone(),
            execution_id: execution_id.to_string(),
            last_started_at: started_at,
            refreshed_at: now,
            status,
            role: None,
            paused: state.is_paused(),
            variables,
            artifacts: execution
                .artifact_revisions
                .iter()
                .map(ArtifactRevisionView::build)
                .collect(),
            stages: state
                .stage_states
                .iter()
                .map(|stage| StageView::build(stage, execution_id))
                .collect(),
            running_duration,
            current_stage_name,
            first_failing_stage_name,
            first_failing_stage_error_message,
        }
    }

    /// Attaches the account's display tag
    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Time since this view was built
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.refreshed_at
    }

    /// The failing-stage message cut to `limit` characters plus an ellipsis
    pub fn truncated_error_message(&self, limit: usize) -> Option<String> {
        let message = self.first_failing_stage_error_message.as_deref()?;
        if message.chars().count() <= limit {
            return Some(message.to_string());
        }
        let cut: String = message.chars().take(limit).collect();
        Some(format!("{cut}..."))
    }

    /// [`truncated_error_message`](Self::truncated_error_message) with the default limit
    pub fn short_error_message(&self) -> Option<String> {
        self.truncated_error_message(DEFAULT_MESSAGE_LIMIT)
    }

    /// Whether the failing-stage message would be cut at `limit`
    pub fn has_long_error_message(&self, limit: usize) -> bool {
        self.first_failing_stage_error_message
            .as_deref()
            .is_some_and(|message| message.chars().count() > limit)
    }
}

fn serialize_seconds<S>(duration: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match duration {
        Some(duration) => serializer.serialize_i64(duration.num_seconds()),
        None => serializer.serialize_none(),
    }
}
