//! Per-pipeline polling errors

use pipewatch_client::ClientError;
use std::time::Duration;
use thiserror::Error;

/// Why a pipeline (or an account listing) could not be refreshed
#[derive(Debug, Error)]
pub enum PollError {
    /// The provider rejected or failed a call
    #[error("{operation} failed: {source}")]
    Client {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    /// The provider did not answer within the fetch timeout
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The pipeline has never been executed
    #[error("pipeline '{0}' has no executions")]
    NoExecutions(String),
}

impl PollError {
    pub fn client(operation: &'static str, source: ClientError) -> Self {
        Self::Client { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_one_line() {
        let err = PollError::client("GetPipelineState", ClientError::api_error(500, "boom"));
        assert_eq!(
            err.to_string(),
            "GetPipelineState failed: API error (status 500): boom"
        );

        let err = PollError::Timeout {
            operation: "ListPipelines",
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "ListPipelines timed out after 10s");

        let err = PollError::NoExecutions("api".to_string());
        assert_eq!(err.to_string(), "pipeline 'api' has no executions");
    }
}
