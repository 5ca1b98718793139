//! Pipeline-related provider operations

use async_trait::async_trait;
use pipewatch_core::domain::pipeline::{
    PipelineExecution, PipelineExecutionSummary, PipelineState,
};
use pipewatch_core::dto::{
    GetPipelineExecutionInput, GetPipelineExecutionOutput, GetPipelineStateInput,
    ListPipelineExecutionsInput, ListPipelineExecutionsOutput, ListPipelinesInput,
    ListPipelinesOutput, target,
};

use crate::error::Result;
use crate::{HttpProviderClient, PipelineProvider};

/// Guards against a provider that keeps handing out the same page token
const MAX_PIPELINE_PAGES: usize = 100;

#[async_trait]
impl PipelineProvider for HttpProviderClient {
    /// Follows `nextToken` until every page has been read
    async fn list_pipelines(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut input = ListPipelinesInput::default();

        for _ in 0..MAX_PIPELINE_PAGES {
            let page: ListPipelinesOutput = self.call(target::LIST_PIPELINES, &input).await?;
            names.extend(page.pipelines.into_iter().map(|entry| entry.name));

            match page.next_token {
                Some(token) if !token.is_empty() => input.next_token = Some(token),
                _ => return Ok(names),
            }
        }

        tracing::warn!(
            "Stopped listing pipelines at {} after {} pages",
            self.base_url(),
            MAX_PIPELINE_PAGES
        );
        Ok(names)
    }

    async fn get_pipeline_state(&self, pipeline_name: &str) -> Result<PipelineState> {
        let input = GetPipelineStateInput {
            name: pipeline_name.to_string(),
        };
        self.call(target::GET_PIPELINE_STATE, &input).await
    }

    /// Only the first page is read; it holds the most recent executions
    async fn list_pipeline_executions(
        &self,
        pipeline_name: &str,
    ) -> Result<Vec<PipelineExecutionSummary>> {
        let input = ListPipelineExecutionsInput {
            pipeline_name: pipeline_name.to_string(),
        };
        let output: ListPipelineExecutionsOutput =
            self.call(target::LIST_PIPELINE_EXECUTIONS, &input).await?;
        Ok(output.pipeline_execution_summaries)
    }

    async fn get_pipeline_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution> {
        let input = GetPipelineExecutionInput {
            pipeline_name: pipeline_name.to_string(),
            pipeline_execution_id: execution_id.to_string(),
        };
        let output: GetPipelineExecutionOutput =
            self.call(target::GET_PIPELINE_EXECUTION, &input).await?;
        Ok(output.pipeline_execution)
    }
}
