//! The shared environment: who is registered, what is waiting in each
//! mailbox, and what each agent perceives.
//!
//! Every operation returns a new [`Environment`]. The multi-agent system owns
//! the only current value and swaps it under its lock.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use bdi_agent::{AgentId, BeliefBase, Message};

/// Source of the beliefs an agent perceives at the start of each cycle.
pub trait Perception: Send + Sync + fmt::Debug {
    fn perceive(&self, agent: AgentId) -> BeliefBase;
}

/// Perceives nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerception;

impl Perception for NoPerception {
    fn perceive(&self, _agent: AgentId) -> BeliefBase {
        BeliefBase::empty()
    }
}

/// Fixed perceptions per agent; agents without an entry perceive nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticPerception {
    percepts: HashMap<AgentId, BeliefBase>,
}

impl StaticPerception {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, agent: AgentId, beliefs: BeliefBase) -> Self {
        self.percepts.insert(agent, beliefs);
        self
    }
}

impl Perception for StaticPerception {
    fn perceive(&self, agent: AgentId) -> BeliefBase {
        self.percepts.get(&agent).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    agents: BTreeMap<AgentId, String>,
    mailboxes: HashMap<AgentId, VecDeque<Message>>,
    broadcasts: Vec<Message>,
    perception: Arc<dyn Perception>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::with_perception(Arc::new(NoPerception))
    }

    pub fn with_perception(perception: Arc<dyn Perception>) -> Self {
        Self {
            agents: BTreeMap::new(),
            mailboxes: HashMap::new(),
            broadcasts: Vec::new(),
            perception,
        }
    }

    /// Registers an agent with an empty mailbox. Re-adding keeps the mailbox.
    pub fn add_agent(&self, id: AgentId, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.agents.insert(id, name.into());
        next.mailboxes.entry(id).or_default();
        next
    }

    /// Unregisters an agent and discards its undelivered messages.
    pub fn remove_agent(&self, id: AgentId) -> Self {
        let mut next = self.clone();
        next.agents.remove(&id);
        next.mailboxes.remove(&id);
        next
    }

    /// Appends `message` to the recipient's mailbox. Messages for unknown
    /// agents are dropped.
    pub fn submit_message(&self, recipient: AgentId, message: Message) -> Self {
        let Some(mailbox) = self.mailboxes.get(&recipient) else {
            warn!(recipient = %recipient, message = %message, "Dropping message for unknown agent");
            return self.clone();
        };
        let mut mailbox = mailbox.clone();
        mailbox.push_back(message);
        let mut next = self.clone();
        next.mailboxes.insert(recipient, mailbox);
        next
    }

    /// Delivers `message` to every registered agent, sender included, and
    /// records it in the broadcast log.
    pub fn broadcast_message(&self, message: Message) -> Self {
        let mut next = self.clone();
        for mailbox in next.mailboxes.values_mut() {
            mailbox.push_back(message.clone());
        }
        next.broadcasts.push(message);
        next
    }

    /// Drains the agent's mailbox in arrival order.
    pub fn take_messages(&self, id: AgentId) -> (Self, Vec<Message>) {
        match self.mailboxes.get(&id) {
            Some(mailbox) if !mailbox.is_empty() => {
                let messages = mailbox.iter().cloned().collect();
                let mut next = self.clone();
                next.mailboxes.insert(id, VecDeque::new());
                (next, messages)
            }
            _ => (self.clone(), Vec::new()),
        }
    }

    pub fn perceive(&self, id: AgentId) -> BeliefBase {
        self.perception.perceive(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn agent_id(&self, name: &str) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    pub fn agent_name(&self, id: AgentId) -> Option<&str> {
        self.agents.get(&id).map(String::as_str)
    }

    /// Registered agents, ordered by id.
    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &str)> {
        self.agents.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn pending_messages(&self, id: AgentId) -> usize {
        self.mailboxes.get(&id).map(VecDeque::len).unwrap_or(0)
    }

    pub fn broadcast_log(&self) -> &[Message] {
        &self.broadcasts
    }
}
