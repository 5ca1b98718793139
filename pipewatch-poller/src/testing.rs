//! In-memory provider used by the poller tests

use async_trait::async_trait;
use chrono::{TimeDelta, TimeZone, Utc};
use pipewatch_client::{ClientError, PipelineProvider, Result};
use pipewatch_core::ExecutionStatus;
use pipewatch_core::domain::pipeline::{
    ArtifactRevision, PipelineExecution, PipelineExecutionSummary, PipelineState,
    StageExecution, StageState, TransitionState,
};
use std::time::Duration;

/// Canned answers for one pipeline
#[derive(Debug, Clone)]
pub struct FakePipeline {
    name: String,
    execution_id: String,
    status: ExecutionStatus,
    older_execution: Option<String>,
    failing: bool,
    never_run: bool,
    delay: Option<Duration>,
}

impl FakePipeline {
    pub fn new(name: &str, execution_id: &str, status: ExecutionStatus) -> Self {
        Self {
            name: name.to_string(),
            execution_id: execution_id.to_string(),
            status,
            older_execution: None,
            failing: false,
            never_run: false,
            delay: None,
        }
    }

    /// Adds an earlier execution, listed before the latest one
    pub fn with_older_execution(mut self, execution_id: &str) -> Self {
        self.older_execution = Some(execution_id.to_string());
        self
    }

    /// State requests fail with a server error
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn never_run(mut self) -> Self {
        self.never_run = true;
        self
    }

    /// State requests take this long to answer
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Provider serving a fixed set of pipelines
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    pipelines: Vec<FakePipeline>,
    unlistable: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipeline(mut self, pipeline: FakePipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Listing pipelines fails for the whole account
    pub fn unlistable(mut self) -> Self {
        self.unlistable = true;
        self
    }

    fn find(&self, name: &str) -> Result<&FakePipeline> {
        self.pipelines
            .iter()
            .find(|pipeline| pipeline.name == name)
            .ok_or_else(|| ClientError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl PipelineProvider for FakeProvider {
    async fn list_pipelines(&self) -> Result<Vec<String>> {
        if self.unlistable {
            return Err(ClientError::api_error(503, "Service unavailable"));
        }
        Ok(self.pipelines.iter().map(|p| p.name.clone()).collect())
    }

    async fn get_pipeline_state(&self, pipeline_name: &str) -> Result<PipelineState> {
        let pipeline = self.find(pipeline_name)?;
        if let Some(delay) = pipeline.delay {
            tokio::time::sleep(delay).await;
        }
        if pipeline.failing {
            return Err(ClientError::api_error(500, "Internal failure"));
        }

        Ok(PipelineState {
            pipeline_name: pipeline.name.clone(),
            stage_states: vec![StageState {
                stage_name: "Deploy".to_string(),
                latest_execution: Some(StageExecution {
                    pipeline_execution_id: pipeline.execution_id.clone(),
                    status: pipeline.status.clone(),
                }),
                inbound_transition_state: Some(TransitionState {
                    enabled: true,
                    disabled_reason: None,
                    last_changed_at: None,
                }),
                action_states: vec![],
            }],
        })
    }

    async fn list_pipeline_executions(
        &self,
        pipeline_name: &str,
    ) -> Result<Vec<PipelineExecutionSummary>> {
        let pipeline = self.find(pipeline_name)?;
        if pipeline.never_run {
            return Ok(vec![]);
        }

        let latest_start = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let mut summaries = Vec::new();
        if let Some(older) = &pipeline.older_execution {
            summaries.push(PipelineExecutionSummary {
                pipeline_execution_id: older.clone(),
                start_time: latest_start - TimeDelta::hours(1),
                status: Some(ExecutionStatus::Succeeded),
            });
        }
        summaries.push(PipelineExecutionSummary {
            pipeline_execution_id: pipeline.execution_id.clone(),
            start_time: latest_start,
            status: Some(pipeline.status.clone()),
        });
        // Oldest first, so selection cannot rely on listing order.
        Ok(summaries)
    }

    async fn get_pipeline_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution> {
        let pipeline = self.find(pipeline_name)?;
        let status = if execution_id == pipeline.execution_id {
            pipeline.status.clone()
        } else {
            ExecutionStatus::Succeeded
        };

        Ok(PipelineExecution {
            pipeline_execution_id: execution_id.to_string(),
            status,
            variables: None,
            artifact_revisions: vec![ArtifactRevision {
                name: "source".to_string(),
                revision_id: "abc123".to_string(),
                revision_summary: Some("Bump dependencies".to_string()),
            }],
        })
    }
}
