use std::sync::Arc;

use bdi_core::Unifier;

use crate::config::AgentConfig;
use crate::types::AgentId;

/// Read-only view of the agent handed to policies and actions for one cycle.
#[derive(Debug, Clone)]
pub struct AgentContext {
    agent_id: AgentId,
    name: String,
    cycle: u64,
    config: Arc<AgentConfig>,
    unifier: Arc<dyn Unifier>,
}

impl AgentContext {
    pub fn new(
        agent_id: AgentId,
        name: impl Into<String>,
        cycle: u64,
        config: Arc<AgentConfig>,
        unifier: Arc<dyn Unifier>,
    ) -> Self {
        Self {
            agent_id,
            name: name.into(),
            cycle,
            config,
            unifier,
        }
    }

    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn unifier(&self) -> &dyn Unifier {
        self.unifier.as_ref()
    }
}
