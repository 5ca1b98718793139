//! Pipeline domain types
//!
//! Raw state and execution records for one pipeline, shaped after the
//! provider's JSON responses. Every field the provider may omit is an
//! `Option` (or defaults to an empty list) and must be checked explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::epoch;
use super::status::ExecutionStatus;

/// Current state of every stage in a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    pub pipeline_name: String,
    #[serde(default)]
    pub stage_states: Vec<StageState>,
}

impl PipelineState {
    /// True when any stage has its inbound transition disabled
    pub fn is_paused(&self) -> bool {
        self.stage_states.iter().any(StageState::is_paused)
    }
}

/// State of a single stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageState {
    pub stage_name: String,
    #[serde(default)]
    pub latest_execution: Option<StageExecution>,
    #[serde(default)]
    pub inbound_transition_state: Option<TransitionState>,
    #[serde(default)]
    pub action_states: Vec<ActionState>,
}

impl StageState {
    pub fn status(&self) -> Option<&ExecutionStatus> {
        self.latest_execution.as_ref().map(|execution| &execution.status)
    }

    /// Id of the pipeline execution this stage last ran in
    pub fn execution_id(&self) -> Option<&str> {
        self.latest_execution
            .as_ref()
            .map(|execution| execution.pipeline_execution_id.as_str())
    }

    pub fn is_failed(&self) -> bool {
        self.status().is_some_and(ExecutionStatus::is_failed)
    }

    /// A stage without a reported transition state is never paused
    pub fn is_paused(&self) -> bool {
        self.inbound_transition_state
            .as_ref()
            .is_some_and(|transition| !transition.enabled)
    }

    pub fn paused_reason(&self) -> Option<&str> {
        self.inbound_transition_state
            .as_ref()
            .filter(|transition| !transition.enabled)
            .and_then(|transition| transition.disabled_reason.as_deref())
    }

    /// Error message of the first failed action, in declared order
    pub fn failed_action_message(&self) -> Option<&str> {
        self.action_states
            .iter()
            .filter_map(|action| action.latest_execution.as_ref())
            .find(|execution| execution.is_failed())
            .and_then(ActionExecution::error_message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageExecution {
    pub pipeline_execution_id: String,
    pub status: ExecutionStatus,
}

/// Whether executions may flow into a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionState {
    pub enabled: bool,
    #[serde(default)]
    pub disabled_reason: Option<String>,
    #[serde(default, with = "epoch::option")]
    pub last_changed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState {
    pub action_name: String,
    #[serde(default)]
    pub latest_execution: Option<ActionExecution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecution {
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error_details: Option<ErrorDetails>,
}

impl ActionExecution {
    pub fn is_failed(&self) -> bool {
        self.status.as_ref().is_some_and(ExecutionStatus::is_failed)
    }

    /// Structured error message, falling back to the plain summary
    pub fn error_message(&self) -> Option<&str> {
        self.error_details
            .as_ref()
            .and_then(|details| details.message.as_deref())
            .or(self.summary.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Full detail of one pipeline execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    pub pipeline_execution_id: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub variables: Option<Vec<ResolvedPipelineVariable>>,
    #[serde(default)]
    pub artifact_revisions: Vec<ArtifactRevision>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPipelineVariable {
    pub name: String,
    pub resolved_value: String,
}

/// Source revision an execution was started from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRevision {
    pub name: String,
    #[serde(default)]
    pub revision_id: String,
    /// Plain text, or a JSON object describing a source commit
    #[serde(default)]
    pub revision_summary: Option<String>,
}

/// Entry of the execution history listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecutionSummary {
    pub pipeline_execution_id: String,
    #[serde(with = "epoch")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
}

impl PipelineExecutionSummary {
    /// Picks the most recently started execution
    pub fn latest(summaries: &[PipelineExecutionSummary]) -> Option<&PipelineExecutionSummary> {
        summaries.iter().max_by_key(|summary| summary.start_time)
    }
}
