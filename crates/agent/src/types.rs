use serde::{Deserialize, Serialize};
use std::fmt;

use bdi_core::Term;

pub use bdi_core::{AgentId, IntentionId};

/// Speech act carried by a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performative {
    /// Recipient should believe the content
    Tell,
    /// Recipient should stop believing the content
    Untell,
    /// Recipient should adopt the content as an achievement goal
    Achieve,
}

impl Performative {
    pub fn from_term(term: &Term) -> Option<Self> {
        match term.as_atom()? {
            "tell" => Some(Performative::Tell),
            "untell" => Some(Performative::Untell),
            "achieve" => Some(Performative::Achieve),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Performative::Tell => "tell",
            Performative::Untell => "untell",
            Performative::Achieve => "achieve",
        }
    }
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: AgentId,
    pub performative: Performative,
    pub content: Term,
}

impl Message {
    pub fn new(sender: AgentId, performative: Performative, content: Term) -> Self {
        Self {
            sender,
            performative,
            content,
        }
    }

    pub fn tell(sender: AgentId, content: Term) -> Self {
        Self::new(sender, Performative::Tell, content)
    }

    pub fn untell(sender: AgentId, content: Term) -> Self {
        Self::new(sender, Performative::Untell, content)
    }

    pub fn achieve(sender: AgentId, content: Term) -> Self {
        Self::new(sender, Performative::Achieve, content)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) from {}", self.performative, self.content, self.sender)
    }
}
