//! Pipewatch Provider Client
//!
//! The contract the poller needs from a CI/CD provider, plus an HTTP
//! implementation speaking the CodePipeline JSON 1.1 protocol.
//!
//! Request signing and credential setup are not handled here: the endpoint
//! is expected to be a signing proxy or a compatible gateway for one account.
//!
//! # Example
//!
//! ```no_run
//! use pipewatch_client::{HttpProviderClient, PipelineProvider};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipewatch_client::ClientError> {
//!     let client = HttpProviderClient::new("http://localhost:4566", Duration::from_secs(10))?;
//!
//!     for name in client.list_pipelines().await? {
//!         let state = client.get_pipeline_state(&name).await?;
//!         println!("{}: {} stage(s)", name, state.stage_states.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod pipelines;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use pipewatch_core::domain::pipeline::{
    PipelineExecution, PipelineExecutionSummary, PipelineState,
};
use pipewatch_core::dto::ErrorBody;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Capabilities the poller needs from one provider account
#[async_trait]
pub trait PipelineProvider: Send + Sync {
    /// Names of every pipeline in the account
    async fn list_pipelines(&self) -> Result<Vec<String>>;

    /// Current state of every stage of a pipeline
    async fn get_pipeline_state(&self, pipeline_name: &str) -> Result<PipelineState>;

    /// Recent executions of a pipeline, with their start times
    async fn list_pipeline_executions(
        &self,
        pipeline_name: &str,
    ) -> Result<Vec<PipelineExecutionSummary>>;

    /// Full detail of one execution, including variables and artifacts
    async fn get_pipeline_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution>;
}

/// HTTP client for one provider account
#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    /// Endpoint of the provider (e.g., "https://codepipeline-proxy.internal")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl HttpProviderClient {
    /// Create a client whose every request is bounded by `timeout`
    ///
    /// # Arguments
    /// * `base_url` - The provider endpoint
    /// * `timeout` - Upper bound for a single request, connection included
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the endpoint of the provider
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Handling
    // =============================================================================

    /// Send one JSON 1.1 operation and deserialize its output
    async fn call<I, O>(&self, target: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized + Sync,
        O: DeserializeOwned,
    {
        tracing::trace!(target_op = target, "Calling provider");

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .header("X-Amz-Target", target)
            .header("Content-Type", "application/x-amz-json-1.1")
            .json(input)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check the status code and deserialize the body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(error_from_body(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Map a provider error body to a client error
fn error_from_body(status: u16, text: &str) -> ClientError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body.message.clone().unwrap_or_else(|| text.to_string());

    match body.kind() {
        Some("PipelineNotFoundException" | "PipelineExecutionNotFoundException") => {
            ClientError::NotFound(message)
        }
        _ => ClientError::api_error(status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpProviderClient::new("http://localhost:4566", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4566");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = HttpProviderClient::with_client("http://localhost:4566/", Client::new());
        assert_eq!(client.base_url(), "http://localhost:4566");
    }

    #[test]
    fn test_not_found_exception_maps_to_not_found() {
        let err = error_from_body(
            400,
            r#"{"__type":"PipelineNotFoundException","message":"pipeline missing"}"#,
        );
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "pipeline missing"));
    }

    #[test]
    fn test_throttling_keeps_status_and_message() {
        let err = error_from_body(400, r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#);
        assert!(matches!(
            err,
            ClientError::ApiError { status: 400, ref message } if message == "Rate exceeded"
        ));
    }

    #[test]
    fn test_non_json_error_body_is_used_verbatim() {
        let err = error_from_body(502, "Bad Gateway");
        assert!(matches!(
            err,
            ClientError::ApiError { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_request_failure() {
        let client = HttpProviderClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.list_pipelines().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
        assert!(err.is_transient());
    }
}
