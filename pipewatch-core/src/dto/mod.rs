//! Data Transfer Objects for provider communication
//!
//! Request and response envelopes of the provider's JSON API. The payloads
//! they carry are the domain types in [`crate::domain::pipeline`].

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::{PipelineExecution, PipelineExecutionSummary};

/// Operation names sent in the `X-Amz-Target` header
pub mod target {
    pub const LIST_PIPELINES: &str = "CodePipeline_20150709.ListPipelines";
    pub const GET_PIPELINE_STATE: &str = "CodePipeline_20150709.GetPipelineState";
    pub const LIST_PIPELINE_EXECUTIONS: &str = "CodePipeline_20150709.ListPipelineExecutions";
    pub const GET_PIPELINE_EXECUTION: &str = "CodePipeline_20150709.GetPipelineExecution";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesOutput {
    #[serde(default)]
    pub pipelines: Vec<PipelineEntry>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPipelineStateInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineExecutionsInput {
    pub pipeline_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineExecutionsOutput {
    #[serde(default)]
    pub pipeline_execution_summaries: Vec<PipelineExecutionSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineExecutionInput {
    pub pipeline_name: String,
    pub pipeline_execution_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineExecutionOutput {
    pub pipeline_execution: PipelineExecution,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Short exception name, without the namespace prefix
    pub fn kind(&self) -> Option<&str> {
        self.error_type
            .as_deref()
            .map(|error_type| error_type.rsplit('#').next().unwrap_or(error_type))
    }
}
