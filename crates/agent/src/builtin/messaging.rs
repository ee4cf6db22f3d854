use tracing::debug;

use bdi_core::Term;

use crate::actions::{Action, ActionRequest, ActionResponse};
use crate::effects::EnvironmentChange;
use crate::error::{ActionError, ActionResult};
use crate::types::{AgentId, Message, Performative};

fn performative(term: &Term) -> ActionResult<Performative> {
    Performative::from_term(term)
        .ok_or_else(|| ActionError::InvalidArguments(format!("unknown performative {}", term)))
}

/// `send(To, Performative, Content)`: queues a message for the agent named `To`.
pub struct SendAction;

impl Action for SendAction {
    fn name(&self) -> &str {
        "send"
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        request.expect_arity(3)?;
        let to = request.argument(0)?;
        let recipient = to
            .as_atom()
            .map(AgentId::named)
            .ok_or_else(|| {
                ActionError::InvalidArguments(format!(
                    "recipient must be an agent name, got {}",
                    to
                ))
            })?;
        let message = Message::new(
            request.context.agent_id(),
            performative(request.argument(1)?)?,
            request.argument(2)?.clone(),
        );
        debug!(
            agent_id = %request.context.agent_id(),
            recipient = %to,
            message = %message,
            "Sending message"
        );
        Ok(ActionResponse::ok().with_effect(EnvironmentChange::SendMessage { recipient, message }))
    }
}

/// `broadcast(Performative, Content)`: queues a message for every agent.
pub struct BroadcastAction;

impl Action for BroadcastAction {
    fn name(&self) -> &str {
        "broadcast"
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        request.expect_arity(2)?;
        let message = Message::new(
            request.context.agent_id(),
            performative(request.argument(0)?)?,
            request.argument(1)?.clone(),
        );
        Ok(ActionResponse::ok().with_effect(EnvironmentChange::BroadcastMessage(message)))
    }
}
