pub mod actions;
pub mod agent;
pub mod beliefs;
pub mod builtin;
pub mod config;
pub mod context;
pub mod effects;
pub mod error;
pub mod events;
pub mod goals;
pub mod intention;
pub mod plans;
pub mod policy;
pub mod types;

pub use actions::{action_fn, Action, ActionRegistry, ActionRequest, ActionResponse};
pub use agent::{Agent, AgentBuilder, CycleReport, DropReason, EventHandling, Execution};
pub use beliefs::{Belief, BeliefBase, BeliefUpdate};
pub use config::{AgentConfig, DroppedEventDiagnostics};
pub use context::AgentContext;
pub use effects::{AgentChange, Effect, EnvironmentChange};
pub use error::{ActionError, ActionResult, AgentError, Result};
pub use events::{Event, EventQueue, Trigger, TriggerKind};
pub use goals::{Condition, Goal, Guard};
pub use intention::{
    run_intention, ActivationRecord, FrameFailure, Intention, IntentionPool, IntentionStatus,
    IntentionStep, StepContext, StepOutcome,
};
pub use plans::{Plan, PlanId, PlanLibrary};
pub use policy::Policies;
pub use types::{AgentId, IntentionId, Message, Performative};

pub mod prelude {
    pub use crate::actions::{action_fn, Action, ActionRequest, ActionResponse};
    pub use crate::agent::{Agent, CycleReport, EventHandling};
    pub use crate::beliefs::{Belief, BeliefBase};
    pub use crate::config::AgentConfig;
    pub use crate::effects::{AgentChange, EnvironmentChange};
    pub use crate::error::{ActionError, AgentError};
    pub use crate::events::{Event, Trigger};
    pub use crate::goals::{Goal, Guard};
    pub use crate::plans::Plan;
    pub use crate::policy::Policies;
    pub use crate::types::{AgentId, Message, Performative};
    pub use bdi_core::{Substitution, Term};
}
