//! How agents are turned into running tasks.
//!
//! A strategy wraps an agent in a [`Runnable`] that repeatedly takes the
//! agent's input from the environment, runs one reasoning cycle outside any
//! lock, and commits the cycle's environment changes.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use bdi_agent::{Agent, AgentError, AgentId};

use crate::mas::{finish, MasHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The agent was removed from the environment
    Removed,
    /// No live agent had anything left to do
    Quiescent,
    /// The configured cycle cap was reached
    CycleLimit,
    /// The system was shut down
    Shutdown,
    /// A cycle returned a fatal error
    Failed(String),
}

/// A stopped agent, in the state its last cycle left it.
#[derive(Debug)]
pub struct AgentExit {
    pub agent: Agent,
    pub reason: ExitReason,
    pub cycles: u64,
}

pub struct Runnable {
    agent_id: AgentId,
    future: BoxFuture<'static, AgentExit>,
}

impl Runnable {
    pub fn new(agent_id: AgentId, future: BoxFuture<'static, AgentExit>) -> Self {
        Self { agent_id, future }
    }

    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    pub fn run(self) -> BoxFuture<'static, AgentExit> {
        self.future
    }
}

impl fmt::Debug for Runnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runnable")
            .field("agent_id", &self.agent_id)
            .finish_non_exhaustive()
    }
}

pub trait ExecutionStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn dispatch(&self, agent: Agent, mas: MasHandle) -> Runnable;
}

enum Cycle {
    Ran { idle: bool },
    Removed,
}

/// Input, reasoning, commit.
fn run_cycle(agent: &mut Agent, mas: &MasHandle) -> Result<Cycle, AgentError> {
    let Some((perceptions, inbox)) = mas.perceive(agent.id()) else {
        return Ok(Cycle::Removed);
    };
    let report = agent.reason(&perceptions, inbox)?;
    let idle = agent.is_idle();
    debug!(
        agent_id = %agent.id(),
        cycle = report.cycle,
        changes = report.environment_changes.len(),
        idle,
        "Cycle finished"
    );
    if mas.commit(agent.id(), report.environment_changes, idle) {
        Ok(Cycle::Ran { idle })
    } else {
        Ok(Cycle::Removed)
    }
}

/// Reason to stop before starting another cycle, if any.
fn stop_reason(mas: &MasHandle, cycles: u64) -> Option<ExitReason> {
    if mas.is_shutdown() {
        Some(ExitReason::Shutdown)
    } else if mas.config().cycle_limit_reached(cycles) {
        Some(ExitReason::CycleLimit)
    } else {
        None
    }
}

/// Round-robin turn order shared by every agent of a [`OneCyclePerTurn`]
/// strategy. The agent at the head of the ring holds the turn.
#[derive(Debug, Default)]
struct TurnOrder {
    ring: Mutex<VecDeque<AgentId>>,
    turn_changed: Notify,
}

impl TurnOrder {
    fn join(&self, id: AgentId) {
        self.ring.lock().push_back(id);
        self.turn_changed.notify_waiters();
    }

    fn holds_turn(&self, id: AgentId) -> bool {
        self.ring.lock().front() == Some(&id)
    }

    async fn wait_for_turn(&self, id: AgentId) {
        loop {
            let notified = self.turn_changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.holds_turn(id) {
                return;
            }
            notified.await;
        }
    }

    /// Moves the turn holder to the tail.
    fn pass(&self, id: AgentId) {
        {
            let mut ring = self.ring.lock();
            if ring.front() == Some(&id) {
                ring.rotate_left(1);
            }
        }
        self.turn_changed.notify_waiters();
    }

    fn leave(&self, id: AgentId) {
        self.ring.lock().retain(|queued| *queued != id);
        self.turn_changed.notify_waiters();
    }

    #[cfg(test)]
    fn order(&self) -> Vec<AgentId> {
        self.ring.lock().iter().copied().collect()
    }
}

/// Agents take turns, one cycle per turn, in dispatch order. An agent joins
/// the tail of the turn order when dispatched and leaves it when it stops.
#[derive(Debug, Clone, Default)]
pub struct OneCyclePerTurn {
    turns: Arc<TurnOrder>,
}

impl OneCyclePerTurn {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutionStrategy for OneCyclePerTurn {
    fn name(&self) -> &'static str {
        "one-cycle-per-turn"
    }

    fn dispatch(&self, mut agent: Agent, mas: MasHandle) -> Runnable {
        let id = agent.id();
        let turns = Arc::clone(&self.turns);
        turns.join(id);
        let future = async move {
            let mut cycles = 0;
            let reason = loop {
                turns.wait_for_turn(id).await;
                if let Some(reason) = stop_reason(&mas, cycles) {
                    break reason;
                }
                if mas.is_quiescent() {
                    break ExitReason::Quiescent;
                }
                match run_cycle(&mut agent, &mas) {
                    Ok(Cycle::Ran { .. }) => cycles += 1,
                    Ok(Cycle::Removed) => break ExitReason::Removed,
                    Err(e) => break ExitReason::Failed(e.to_string()),
                }
                turns.pass(id);
            };
            turns.leave(id);
            finish(&mas, agent, reason, cycles)
        };
        Runnable::new(id, future.boxed())
    }
}

/// Each agent cycles until it has nothing left to do, then waits for mail.
/// Stops once every live agent is waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunToQuiescence;

impl ExecutionStrategy for RunToQuiescence {
    fn name(&self) -> &'static str {
        "run-to-quiescence"
    }

    fn dispatch(&self, mut agent: Agent, mas: MasHandle) -> Runnable {
        let id = agent.id();
        let future = async move {
            let mut cycles = 0;
            let reason = 'run: loop {
                if let Some(reason) = stop_reason(&mas, cycles) {
                    break reason;
                }
                let idle = match run_cycle(&mut agent, &mas) {
                    Ok(Cycle::Ran { idle }) => idle,
                    Ok(Cycle::Removed) => break ExitReason::Removed,
                    Err(e) => break ExitReason::Failed(e.to_string()),
                };
                cycles += 1;
                if !idle {
                    tokio::task::yield_now().await;
                    continue;
                }

                loop {
                    let notified = mas.activity().notified();
                    tokio::pin!(notified);
                    notified.as_mut().enable();

                    if mas.is_shutdown() {
                        break 'run ExitReason::Shutdown;
                    }
                    if !mas.is_registered(id) {
                        break 'run ExitReason::Removed;
                    }
                    if mas.has_mail(id) {
                        break;
                    }
                    if mas.is_quiescent() {
                        break 'run ExitReason::Quiescent;
                    }
                    notified.await;
                }
            };
            finish(&mas, agent, reason, cycles)
        };
        Runnable::new(id, future.boxed())
    }
}

/// Cycles forever, pausing `tick_interval` between cycles. Stops only on
/// removal, shutdown or the cycle cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continuous;

impl ExecutionStrategy for Continuous {
    fn name(&self) -> &'static str {
        "continuous"
    }

    fn dispatch(&self, mut agent: Agent, mas: MasHandle) -> Runnable {
        let id = agent.id();
        let future = async move {
            let tick = mas.config().tick_interval();
            let mut cycles = 0;
            let reason = loop {
                if let Some(reason) = stop_reason(&mas, cycles) {
                    break reason;
                }
                match run_cycle(&mut agent, &mas) {
                    Ok(Cycle::Ran { .. }) => cycles += 1,
                    Ok(Cycle::Removed) => break ExitReason::Removed,
                    Err(e) => break ExitReason::Failed(e.to_string()),
                }
                if tick.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(tick).await;
                }
            };
            finish(&mas, agent, reason, cycles)
        };
        Runnable::new(id, future.boxed())
    }
}
