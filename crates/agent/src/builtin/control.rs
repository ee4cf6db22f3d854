use crate::actions::{Action, ActionRequest, ActionResponse};
use crate::effects::EnvironmentChange;
use crate::error::{ActionError, ActionResult};

/// `fail`: always fails the current plan step.
pub struct FailAction;

impl Action for FailAction {
    fn name(&self) -> &str {
        "fail"
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        let reason = request
            .arguments
            .first()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "explicit failure".to_string());
        Err(ActionError::Failed(reason))
    }
}

/// `stop`: removes the calling agent from the system.
pub struct StopAction;

impl Action for StopAction {
    fn name(&self) -> &str {
        "stop"
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        request.expect_arity(0)?;
        let removal = EnvironmentChange::RemoveAgent(request.context.agent_id());
        Ok(ActionResponse::ok().with_effect(removal))
    }
}
