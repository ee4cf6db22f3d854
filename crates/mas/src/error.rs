use thiserror::Error;

use bdi_agent::AgentId;

#[derive(Debug, Error)]
pub enum MasError {
    /// Another agent with this id is already registered
    #[error("Agent already exists: {0}")]
    AgentAlreadyExists(AgentId),

    /// An agent task panicked or was cancelled
    #[error("Agent task failed to join: {0}")]
    TaskJoin(String),

    /// System configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type for multi-agent operations
pub type Result<T> = std::result::Result<T, MasError>;
