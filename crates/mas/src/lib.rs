pub mod config;
pub mod environment;
pub mod error;
pub mod mas;
pub mod strategy;

pub use config::MasConfig;
pub use environment::{Environment, NoPerception, Perception, StaticPerception};
pub use error::{MasError, Result};
pub use mas::{AgentState, Mas, MasHandle, MasReport};
pub use strategy::{
    AgentExit, Continuous, ExecutionStrategy, ExitReason, OneCyclePerTurn, RunToQuiescence,
    Runnable,
};

pub mod prelude {
    pub use crate::config::MasConfig;
    pub use crate::environment::{Environment, Perception};
    pub use crate::error::MasError;
    pub use crate::mas::{Mas, MasHandle, MasReport};
    pub use crate::strategy::{
        Continuous, ExecutionStrategy, ExitReason, OneCyclePerTurn, RunToQuiescence,
    };
}
