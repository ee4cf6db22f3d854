use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use bdi_agent::{Agent, AgentId, BeliefBase, EnvironmentChange, Message};

use crate::config::MasConfig;
use crate::environment::Environment;
use crate::error::{MasError, Result};
use crate::strategy::{AgentExit, ExecutionStrategy, ExitReason, Runnable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Starting,
    Running,
    Stopped,
    Removed,
    Failed,
}

impl AgentState {
    pub fn is_live(&self) -> bool {
        matches!(self, AgentState::Starting | AgentState::Running)
    }
}

struct SharedState {
    environment: Environment,
    /// Agents whose last cycle left them with nothing to do
    idle: HashSet<AgentId>,
}

struct Inner {
    state: Mutex<SharedState>,
    lifecycle: DashMap<AgentId, AgentState>,
    spawn_tx: mpsc::UnboundedSender<Agent>,
    shutdown: watch::Sender<bool>,
    activity: Notify,
    config: MasConfig,
}

/// Shared access to a running system, handed to every runnable.
///
/// The environment sits behind a single lock. It is held only to take an
/// agent's input or to commit a cycle's changes, never across a cycle.
#[derive(Clone)]
pub struct MasHandle {
    inner: Arc<Inner>,
}

impl MasHandle {
    fn new(
        config: MasConfig,
        environment: Environment,
        spawn_tx: mpsc::UnboundedSender<Agent>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SharedState {
                    environment,
                    idle: HashSet::new(),
                }),
                lifecycle: DashMap::new(),
                spawn_tx,
                shutdown,
                activity: Notify::new(),
                config,
            }),
        }
    }

    pub fn config(&self) -> &MasConfig {
        &self.inner.config
    }

    /// Snapshot of the current environment.
    pub fn environment(&self) -> Environment {
        self.inner.state.lock().environment.clone()
    }

    /// Perceptions and delivered messages for the agent's next cycle, or
    /// `None` once the agent has been removed.
    pub fn perceive(&self, id: AgentId) -> Option<(BeliefBase, Vec<Message>)> {
        let mut state = self.inner.state.lock();
        if !state.environment.contains(id) {
            return None;
        }
        let (environment, messages) = state.environment.take_messages(id);
        state.environment = environment;
        state.idle.remove(&id);
        Some((state.environment.perceive(id), messages))
    }

    /// Applies the changes produced by one cycle of `id`. Changes from an
    /// agent that was removed while it was reasoning are discarded. Returns
    /// whether the agent is still registered afterwards.
    pub fn commit(&self, id: AgentId, changes: Vec<EnvironmentChange>, idle: bool) -> bool {
        let registered = {
            let mut state = self.inner.state.lock();
            if !state.environment.contains(id) {
                debug!(
                    agent_id = %id,
                    discarded = changes.len(),
                    "Discarding changes of removed agent"
                );
                false
            } else {
                self.apply_locked(&mut state, changes);
                if idle {
                    state.idle.insert(id);
                } else {
                    state.idle.remove(&id);
                }
                state.environment.contains(id)
            }
        };
        self.inner.activity.notify_waiters();
        registered
    }

    /// Applies `changes` in order under one lock acquisition.
    pub fn apply_environment_effects(&self, changes: Vec<EnvironmentChange>) {
        {
            let mut state = self.inner.state.lock();
            self.apply_locked(&mut state, changes);
        }
        self.inner.activity.notify_waiters();
    }

    fn apply_locked(&self, state: &mut SharedState, changes: Vec<EnvironmentChange>) {
        for change in changes {
            match change {
                EnvironmentChange::SendMessage { recipient, message } => {
                    state.environment = state.environment.submit_message(recipient, message);
                }
                EnvironmentChange::BroadcastMessage(message) => {
                    state.environment = state.environment.broadcast_message(message);
                }
                EnvironmentChange::SpawnAgent(agent) => {
                    let id = agent.id();
                    if state.environment.contains(id) {
                        warn!(agent_id = %id, "Ignoring spawn of an agent that already exists");
                        continue;
                    }
                    state.environment = state.environment.add_agent(id, agent.name());
                    self.inner.lifecycle.insert(id, AgentState::Starting);
                    info!(agent_id = %id, agent_name = %agent.name(), "Spawning agent");
                    if self.inner.spawn_tx.send(*agent).is_err() {
                        warn!(agent_id = %id, "System is no longer dispatching agents");
                        state.environment = state.environment.remove_agent(id);
                        self.inner.lifecycle.insert(id, AgentState::Failed);
                    }
                }
                EnvironmentChange::RemoveAgent(id) => {
                    if state.environment.contains(id) {
                        state.environment = state.environment.remove_agent(id);
                        state.idle.remove(&id);
                        self.inner.lifecycle.insert(id, AgentState::Removed);
                        info!(agent_id = %id, "Removed agent");
                    }
                }
            }
        }
    }

    /// Every live agent finished its last cycle idle and has no mail.
    pub fn is_quiescent(&self) -> bool {
        let state = self.inner.state.lock();
        let quiescent = state
            .environment
            .agents()
            .filter(|(id, _)| self.agent_state(*id).is_some_and(|s| s.is_live()))
            .all(|(id, _)| {
                state.idle.contains(&id) && state.environment.pending_messages(id) == 0
            });
        quiescent
    }

    pub fn has_mail(&self, id: AgentId) -> bool {
        self.inner.state.lock().environment.pending_messages(id) > 0
    }

    pub fn is_registered(&self, id: AgentId) -> bool {
        self.inner.state.lock().environment.contains(id)
    }

    /// Asks every runnable to stop at its next cycle boundary.
    pub fn shutdown(&self) {
        info!("Shutdown requested");
        self.inner.shutdown.send_replace(true);
        self.inner.activity.notify_waiters();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    pub fn agent_state(&self, id: AgentId) -> Option<AgentState> {
        self.inner.lifecycle.get(&id).map(|s| *s)
    }

    pub(crate) fn set_state(&self, id: AgentId, state: AgentState) {
        self.inner.lifecycle.insert(id, state);
    }

    /// Woken whenever the environment changes or an agent stops.
    pub fn activity(&self) -> &Notify {
        &self.inner.activity
    }
}

impl fmt::Debug for MasHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasHandle")
            .field("agents", &self.environment().len())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

/// Outcome of [`Mas::start`].
#[derive(Debug)]
pub struct MasReport {
    pub environment: Environment,
    pub exits: Vec<AgentExit>,
}

impl MasReport {
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.exits
            .iter()
            .map(|exit| &exit.agent)
            .find(|agent| agent.name() == name)
    }

    pub fn exit(&self, id: AgentId) -> Option<&AgentExit> {
        self.exits.iter().find(|exit| exit.agent.id() == id)
    }
}

pub struct Mas {
    handle: MasHandle,
    strategy: Arc<dyn ExecutionStrategy>,
    agents: Vec<Agent>,
    spawn_rx: mpsc::UnboundedReceiver<Agent>,
}

impl Mas {
    pub fn new(
        config: MasConfig,
        strategy: impl ExecutionStrategy + 'static,
        environment: Environment,
        agents: impl IntoIterator<Item = Agent>,
    ) -> Result<Self> {
        let (spawn_tx, spawn_rx) = mpsc::unbounded_channel();
        let mut mas = Self {
            handle: MasHandle::new(config, environment, spawn_tx),
            strategy: Arc::new(strategy),
            agents: Vec::new(),
            spawn_rx,
        };
        for agent in agents {
            mas.add_agent(agent)?;
        }
        Ok(mas)
    }

    /// Registers an agent to be dispatched by [`start`](Self::start).
    pub fn add_agent(&mut self, agent: Agent) -> Result<()> {
        let id = agent.id();
        {
            let mut state = self.handle.inner.state.lock();
            if state.environment.contains(id) {
                return Err(MasError::AgentAlreadyExists(id));
            }
            state.environment = state.environment.add_agent(id, agent.name());
        }
        self.handle.set_state(id, AgentState::Starting);
        self.agents.push(agent);
        Ok(())
    }

    pub fn handle(&self) -> MasHandle {
        self.handle.clone()
    }

    pub fn environment(&self) -> Environment {
        self.handle.environment()
    }

    pub fn strategy(&self) -> &dyn ExecutionStrategy {
        self.strategy.as_ref()
    }

    pub fn apply_environment_effects(&self, changes: Vec<EnvironmentChange>) {
        self.handle.apply_environment_effects(changes);
    }

    /// Dispatches every agent, including those spawned along the way, and
    /// returns once all of them have stopped.
    pub async fn start(mut self) -> Result<MasReport> {
        info!(strategy = self.strategy.name(), agents = self.agents.len(), "Starting system");
        // Every initial agent is dispatched before any of them starts running.
        let runnables: Vec<Runnable> = std::mem::take(&mut self.agents)
            .into_iter()
            .map(|agent| self.dispatch(agent))
            .collect();
        let mut tasks = JoinSet::new();
        for runnable in runnables {
            tasks.spawn(runnable.run());
        }

        let mut exits = Vec::new();
        loop {
            while let Ok(agent) = self.spawn_rx.try_recv() {
                tasks.spawn(self.dispatch(agent).run());
            }
            if tasks.is_empty() {
                break;
            }
            tokio::select! {
                Some(agent) = self.spawn_rx.recv() => {
                    tasks.spawn(self.dispatch(agent).run());
                }
                Some(joined) = tasks.join_next() => match joined {
                    Ok(exit) => exits.push(exit),
                    Err(e) => {
                        error!(error = %e, "Agent task failed");
                        return Err(MasError::TaskJoin(e.to_string()));
                    }
                },
                else => break,
            }
        }

        info!(exits = exits.len(), "System stopped");
        Ok(MasReport {
            environment: self.handle.environment(),
            exits,
        })
    }

    fn dispatch(&self, agent: Agent) -> Runnable {
        let id = agent.id();
        info!(
            agent_id = %id,
            agent_name = %agent.name(),
            strategy = self.strategy.name(),
            "Dispatching agent"
        );
        let runnable = self.strategy.dispatch(agent, self.handle.clone());
        self.handle.set_state(id, AgentState::Running);
        runnable
    }
}

pub(crate) fn finish(mas: &MasHandle, agent: Agent, reason: ExitReason, cycles: u64) -> AgentExit {
    let id = agent.id();
    let state = match &reason {
        ExitReason::Removed => AgentState::Removed,
        ExitReason::Failed(e) => {
            error!(agent_id = %id, error = %e, "Agent failed");
            AgentState::Failed
        }
        _ => AgentState::Stopped,
    };
    mas.set_state(id, state);
    mas.activity().notify_waiters();
    info!(agent_id = %id, reason = ?reason, cycles, "Agent stopped");
    AgentExit {
        agent,
        reason,
        cycles,
    }
}
