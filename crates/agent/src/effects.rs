use std::fmt;

use crate::agent::Agent;
use crate::beliefs::Belief;
use crate::events::Event;
use crate::types::{AgentId, IntentionId, Message};

/// Changes a plan step makes to its own agent. Applied by the reasoning
/// cycle once the step has returned.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentChange {
    AddBelief(Belief),
    RemoveBelief(Belief),
    UpdateBelief(Belief),
    RaiseEvent(Event),
    DropIntention(IntentionId),
}

/// Changes a plan step requests from the shared environment. The agent only
/// returns these; the multi-agent system applies them.
#[derive(Debug, Clone)]
pub enum EnvironmentChange {
    SendMessage { recipient: AgentId, message: Message },
    BroadcastMessage(Message),
    SpawnAgent(Box<Agent>),
    RemoveAgent(AgentId),
}

impl fmt::Display for EnvironmentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentChange::SendMessage { recipient, message } => {
                write!(f, "send {} to {}", message, recipient)
            }
            EnvironmentChange::BroadcastMessage(message) => write!(f, "broadcast {}", message),
            EnvironmentChange::SpawnAgent(agent) => write!(f, "spawn {}", agent.id()),
            EnvironmentChange::RemoveAgent(id) => write!(f, "remove {}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Effect {
    Agent(AgentChange),
    Environment(EnvironmentChange),
}

impl From<AgentChange> for Effect {
    fn from(change: AgentChange) -> Self {
        Effect::Agent(change)
    }
}

impl From<EnvironmentChange> for Effect {
    fn from(change: EnvironmentChange) -> Self {
        Effect::Environment(change)
    }
}

/// Splits a list of effects by target, keeping relative order within each side.
pub fn partition(
    effects: impl IntoIterator<Item = Effect>,
) -> (Vec<AgentChange>, Vec<EnvironmentChange>) {
    let mut agent = Vec::new();
    let mut environment = Vec::new();
    for effect in effects {
        match effect {
            Effect::Agent(change) => agent.push(change),
            Effect::Environment(change) => environment.push(change),
        }
    }
    (agent, environment)
}
