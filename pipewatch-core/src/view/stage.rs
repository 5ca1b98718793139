//! Stage view

use serde::Serialize;

use crate::domain::pipeline::StageState;
use crate::domain::status::ExecutionStatus;

/// One stage of a pipeline as shown to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub name: String,
    /// `None` when the stage has never run
    pub status: Option<ExecutionStatus>,
    /// The stage last ran in an execution other than the current one
    pub outdated: bool,
    /// Inbound transition is disabled
    pub paused: bool,
    pub paused_reason: Option<String>,
    /// Only set for failed stages
    pub error_message: Option<String>,
}

impl StageView {
    pub fn build(stage: &StageState, current_execution_id: &str) -> Self {
        let error_message = if stage.is_failed() {
            stage.failed_action_message().map(str::to_string)
        } else {
            None
        };

        Self {
            name: stage.stage_name.clone(),
            status: stage.status().cloned(),
            outdated: stage.execution_id() != Some(current_execution_id),
            paused: stage.is_paused(),
            paused_reason: stage.paused_reason().map(str::to_string),
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::{ActionExecution, ActionState, StageExecution, TransitionState};

    fn stage(status: &str, execution_id: &str, enabled: bool) -> StageState {
        StageState {
            stage_name: "stage_name".to_string(),
            latest_execution: Some(StageExecution {
                pipeline_execution_id: execution_id.to_string(),
                status: ExecutionStatus::from(status),
            }),
            inbound_transition_state: Some(TransitionState {
                enabled,
                disabled_reason: (!enabled).then(|| "Paused".to_string()),
                last_changed_at: None,
            }),
            action_states: vec![
                ActionState {
                    action_name: "action-1".to_string(),
                    latest_execution: Some(ActionExecution {
                        status: Some(ExecutionStatus::Succeeded),
                        summary: None,
                        error_details: None,
                    }),
                },
                ActionState {
                    action_name: "action-2".to_string(),
                    latest_execution: Some(ActionExecution {
                        status: Some(ExecutionStatus::Failed),
                        summary: Some("action error message".to_string()),
                        error_details: None,
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_name_and_status_come_from_latest_execution() {
        let view = StageView::build(&stage("Failed", "execution-2", false), "execution-1");
        assert_eq!(view.name, "stage_name");
        assert_eq!(view.status, Some(ExecutionStatus::Failed));
    }

    #[test]
    fn test_outdated_when_execution_ids_differ() {
        let raw = stage("Failed", "execution-2", false);
        assert!(StageView::build(&raw, "execution-1").outdated);
        assert!(!StageView::build(&raw, "execution-2").outdated);
    }

    #[test]
    fn test_never_run_stage_is_outdated_without_status() {
        let mut raw = stage("Succeeded", "execution-1", true);
        raw.latest_execution = None;

        let view = StageView::build(&raw, "execution-1");
        assert!(view.outdated);
        assert!(view.status.is_none());
        assert!(view.error_message.is_none());
    }

    #[test]
    fn test_paused_mirrors_disabled_transition() {
        let view = StageView::build(&stage("Failed", "execution-1", false), "execution-1");
        assert!(view.paused);
        assert_eq!(view.paused_reason.as_deref(), Some("Paused"));

        let view = StageView::build(&stage("Succeeded", "execution-1", true), "execution-1");
        assert!(!view.paused);
        assert!(view.paused_reason.is_none());
    }

    #[test]
    fn test_paused_does_not_depend_on_status() {
        let view = StageView::build(&stage("Succeeded", "execution-1", false), "execution-1");
        assert!(view.paused);
        assert!(view.error_message.is_none());

        let view = StageView::build(&stage("Failed", "execution-1", true), "execution-1");
        assert!(!view.paused);
        assert_eq!(view.error_message.as_deref(), Some("action error message"));
    }

    #[test]
    fn test_error_message_from_first_failed_action() {
        let view = StageView::build(&stage("Failed", "execution-2", false), "execution-1");
        assert_eq!(view.error_message.as_deref(), Some("action error message"));
    }

    #[test]
    fn test_no_error_message_unless_failed() {
        let view = StageView::build(&stage("Succeeded", "execution-1", true), "execution-1");
        assert!(view.error_message.is_none());
    }

    #[test]
    fn test_failed_stage_without_failed_action_has_no_message() {
        let mut raw = stage("Failed", "execution-1", true);
        raw.action_states.truncate(1);

        let view = StageView::build(&raw, "execution-1");
        assert!(view.error_message.is_none());
    }
}
