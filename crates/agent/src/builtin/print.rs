use tracing::info;

use crate::actions::{Action, ActionRequest, ActionResponse};
use crate::error::ActionResult;

/// `print(Args...)`: logs its arguments at info level.
pub struct PrintAction;

impl Action for PrintAction {
    fn name(&self) -> &str {
        "print"
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        let text = request
            .arguments
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            agent = %request.context.name(),
            intention_id = %request.intention,
            "{}",
            text
        );
        Ok(ActionResponse::ok())
    }
}
