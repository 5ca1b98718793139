//! Execution status domain type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a pipeline, stage or action execution
///
/// Statuses arrive as plain strings from the provider. The seven known
/// values get their own variant; anything else is kept verbatim in `Other`
/// so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Failed,
    Cancelled,
    Stopping,
    Stopped,
    Superseded,
    InProgress,
    Succeeded,
    Other(String),
}

impl ExecutionStatus {
    /// Returns the provider's name for this status
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Cancelled => "Cancelled",
            ExecutionStatus::Stopping => "Stopping",
            ExecutionStatus::Stopped => "Stopped",
            ExecutionStatus::Superseded => "Superseded",
            ExecutionStatus::InProgress => "InProgress",
            ExecutionStatus::Succeeded => "Succeeded",
            ExecutionStatus::Other(status) => status,
        }
    }

    /// Severity rank used to pick the worst status of a group
    ///
    /// A lower number is a worse status. Unrecognised statuses rank below
    /// `Failed` so they are never hidden behind a healthier member.
    pub fn rank(&self) -> u8 {
        match self {
            ExecutionStatus::Other(_) => 0,
            ExecutionStatus::Failed => 1,
            ExecutionStatus::Cancelled => 2,
            ExecutionStatus::Stopping => 3,
            ExecutionStatus::Stopped => 4,
            ExecutionStatus::Superseded => 5,
            ExecutionStatus::InProgress => 6,
            ExecutionStatus::Succeeded => 7,
        }
    }

    /// True while the execution is still consuming time
    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionStatus::InProgress | ExecutionStatus::Stopping)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionStatus::Failed)
    }
}

impl From<&str> for ExecutionStatus {
    fn from(status: &str) -> Self {
        match status {
            "Failed" => ExecutionStatus::Failed,
            "Cancelled" => ExecutionStatus::Cancelled,
            "Stopping" => ExecutionStatus::Stopping,
            "Stopped" => ExecutionStatus::Stopped,
            "Superseded" => ExecutionStatus::Superseded,
            "InProgress" => ExecutionStatus::InProgress,
            "Succeeded" => ExecutionStatus::Succeeded,
            other => ExecutionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(status: String) -> Self {
        match ExecutionStatus::from(status.as_str()) {
            ExecutionStatus::Other(_) => ExecutionStatus::Other(status),
            known => known,
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
