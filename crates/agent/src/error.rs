use thiserror::Error;

use crate::types::IntentionId;

/// Errors that abort a reasoning cycle.
///
/// Plan failures and unhandled events are not errors: they are expressed as
/// new events re-entering the cycle. What remains here are violated
/// preconditions that the caller has to deal with.
#[derive(Debug, Error)]
pub enum AgentError {
    /// An internal event references an intention that is not in the pool
    #[error("Intention not found: {0}")]
    IntentionNotFound(IntentionId),

    /// An assignment routed an event to the wrong intention
    #[error("Misrouted assignment to {intention}: {reason}")]
    MisroutedAssignment {
        intention: IntentionId,
        reason: String,
    },

    /// Attempted to run an intention with no frames
    #[error("Intention has no frames: {0}")]
    EmptyIntention(IntentionId),

    /// Attempted to run an intention that is waiting for a sub-goal
    #[error("Intention is not runnable: {0}")]
    IntentionNotRunnable(IntentionId),

    /// Agent configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors raised by action implementations. Any of them fails the plan step
/// that invoked the action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action was called with arguments it cannot handle
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No action with this name is registered
    #[error("Unknown action: {0}")]
    Unknown(String),

    /// The action ran and reported failure
    #[error("Action failed: {0}")]
    Failed(String),
}

/// Convenience Result type for action implementations
pub type ActionResult<T> = std::result::Result<T, ActionError>;
