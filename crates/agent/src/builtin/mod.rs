//! Actions every agent gets unless `AgentConfig::register_builtins` is off.

pub mod control;
pub mod messaging;
pub mod print;

pub use control::{FailAction, StopAction};
pub use messaging::{BroadcastAction, SendAction};
pub use print::PrintAction;

use std::sync::Arc;

use crate::actions::ActionRegistry;

pub fn register_builtins(registry: &mut ActionRegistry) {
    registry.register(Arc::new(PrintAction));
    registry.register(Arc::new(SendAction));
    registry.register(Arc::new(BroadcastAction));
    registry.register(Arc::new(FailAction));
    registry.register(Arc::new(StopAction));
}
