//! Pipeline collector
//!
//! Fetches everything needed to summarise one pipeline from its account and
//! builds the summary in one step. Every provider call is bounded by the
//! fetch timeout; an expired call fails the pipeline like any other error.

use pipewatch_client::{ClientError, PipelineProvider};
use pipewatch_core::PipelineSummaryView;
use pipewatch_core::domain::pipeline::PipelineExecutionSummary;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::PollError;

/// A provider account and its display tag
#[derive(Clone)]
pub struct Account {
    pub name: String,
    pub role: Option<String>,
    pub provider: Arc<dyn PipelineProvider>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        role: Option<String>,
        provider: Arc<dyn PipelineProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            provider,
        }
    }
}

/// Fetches and summarises single pipelines
#[derive(Debug, Clone)]
pub struct PipelineCollector {
    fetch_timeout: Duration,
}

impl PipelineCollector {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self { fetch_timeout }
    }

    /// Lists the pipeline names of an account
    pub async fn list_pipelines(&self, account: &Account) -> Result<Vec<String>, PollError> {
        self.bounded("ListPipelines", account.provider.list_pipelines())
            .await
    }

    /// Builds the summary of the most recently started execution
    ///
    /// # Arguments
    /// * `account` - Account owning the pipeline
    /// * `pipeline` - Pipeline name
    pub async fn collect(
        &self,
        account: &Account,
        pipeline: &str,
    ) -> Result<PipelineSummaryView, PollError> {
        let provider = account.provider.as_ref();

        let state = self
            .bounded("GetPipelineState", provider.get_pipeline_state(pipeline))
            .await?;

        let executions = self
            .bounded(
                "ListPipelineExecutions",
                provider.list_pipeline_executions(pipeline),
            )
            .await?;

        let latest = PipelineExecutionSummary::latest(&executions)
            .ok_or_else(|| PollError::NoExecutions(pipeline.to_string()))?;

        // Variables and artifacts are only returned by the detail call.
        let execution = self
            .bounded(
                "GetPipelineExecution",
                provider.get_pipeline_execution(pipeline, &latest.pipeline_execution_id),
            )
            .await?;

        debug!(
            "Fetched {} execution {} ({})",
            pipeline, execution.pipeline_execution_id, execution.status
        );

        Ok(PipelineSummaryView::build(&state, &execution, latest.start_time)
            .with_role(account.role.clone()))
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, PollError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.fetch_timeout, call).await {
            Ok(result) => result.map_err(|source| PollError::client(operation, source)),
            Err(_) => Err(PollError::Timeout {
                operation,
                after: self.fetch_timeout,
            }),
        }
    }
}
