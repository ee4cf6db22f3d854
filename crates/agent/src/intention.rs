//! Intentions: stacks of partially executed plan instances.
//!
//! The bottom frame of an intention was pushed for the external event that
//! created it; every frame above it was pushed for an internal event raised
//! by the frame beneath. A frame that raised a sub-goal stays on the stack,
//! suspended, until the sub-goal's frame completes or fails.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, warn};

use bdi_core::Substitution;

use crate::actions::{ActionRegistry, ActionRequest};
use crate::beliefs::{Belief, BeliefBase};
use crate::context::AgentContext;
use crate::effects::{self, AgentChange, EnvironmentChange};
use crate::error::{AgentError, Result};
use crate::events::{Event, Trigger};
use crate::goals::Goal;
use crate::plans::{Plan, PlanId};
use crate::types::IntentionId;

/// One plan instance on an intention stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRecord {
    plan: PlanId,
    trigger: Trigger,
    body: VecDeque<Goal>,
    substitution: Substitution,
}

impl ActivationRecord {
    /// Frame for an instantiated `plan` pushed in response to `trigger`.
    pub fn new(plan: &Plan, trigger: Trigger) -> Self {
        Self {
            plan: plan.id(),
            trigger,
            body: plan.body().iter().cloned().collect(),
            substitution: Substitution::empty(),
        }
    }

    pub fn plan(&self) -> PlanId {
        self.plan
    }

    /// The event trigger this frame was pushed for.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Goal> {
        self.body.iter()
    }

    pub fn is_exhausted(&self) -> bool {
        self.body.is_empty()
    }

    /// Removes the next goal, rewritten under the frame's substitution.
    pub fn next_goal(&mut self) -> Option<Goal> {
        self.body
            .pop_front()
            .map(|goal| goal.apply(&self.substitution))
    }

    pub fn extend(&mut self, substitution: &Substitution) {
        if !substitution.is_empty() {
            self.substitution = self.substitution.compose(substitution);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentionStatus {
    Runnable,
    /// Waiting for the internal event with this trigger to be handled
    Suspended { waiting_for: Trigger },
}

/// What is left after the top frame of an intention fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameFailure {
    /// A failure event rooted at the intention, which is suspended until the
    /// event has been handled
    Raised(Event),
    /// The stack emptied; carries the external failure event, if the bottom
    /// frame was pushed for a goal
    Abandoned(Option<Event>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intention {
    id: IntentionId,
    stack: Vec<ActivationRecord>,
    status: IntentionStatus,
}

impl Intention {
    pub fn new(id: IntentionId, record: ActivationRecord) -> Self {
        Self {
            id,
            stack: vec![record],
            status: IntentionStatus::Runnable,
        }
    }

    pub fn id(&self) -> IntentionId {
        self.id
    }

    pub fn status(&self) -> &IntentionStatus {
        &self.status
    }

    /// Frames from bottom to top.
    pub fn frames(&self) -> &[ActivationRecord] {
        &self.stack
    }

    pub fn top(&self) -> Option<&ActivationRecord> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut ActivationRecord> {
        self.stack.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn is_runnable(&self) -> bool {
        !self.stack.is_empty() && self.status == IntentionStatus::Runnable
    }

    /// Pushes a frame on top; the frames beneath stay suspended until it is popped.
    pub fn push(&mut self, record: ActivationRecord) {
        self.stack.push(record);
        self.status = IntentionStatus::Runnable;
    }

    pub fn pop(&mut self) -> Option<ActivationRecord> {
        self.stack.pop()
    }

    pub fn suspend(&mut self, waiting_for: Trigger) {
        self.status = IntentionStatus::Suspended { waiting_for };
    }

    pub fn resume(&mut self) {
        self.status = IntentionStatus::Runnable;
    }

    /// Pops every exhausted frame from the top down.
    pub fn pop_exhausted(&mut self) -> usize {
        let mut popped = 0;
        while self.top().map(ActivationRecord::is_exhausted).unwrap_or(false) {
            self.stack.pop();
            popped += 1;
        }
        popped
    }

    /// Pops the top frame as failed. Frames pushed for something other than
    /// a goal have no failure trigger, so failure moves on to the frame
    /// beneath them.
    pub fn fail_top(&mut self) -> FrameFailure {
        while let Some(frame) = self.stack.pop() {
            let Some(failure) = frame.trigger().failure() else {
                continue;
            };
            if self.stack.is_empty() {
                return FrameFailure::Abandoned(Some(Event::external(failure)));
            }
            self.suspend(failure.clone());
            return FrameFailure::Raised(Event::internal(failure, self.id));
        }
        FrameFailure::Abandoned(None)
    }
}

impl fmt::Display for Intention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.id)?;
        for (i, frame) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", frame.trigger())?;
        }
        f.write_str("]")
    }
}

/// The agent's live intentions, in scheduling order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentionPool {
    intentions: VecDeque<Intention>,
    next_id: u64,
}

impl IntentionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id that no intention in this pool has used.
    pub fn fresh_id(&self) -> IntentionId {
        IntentionId(self.next_id)
    }

    pub fn get(&self, id: IntentionId) -> Option<&Intention> {
        self.intentions.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: IntentionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.intentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intentions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intention> {
        self.intentions.iter()
    }

    pub fn ids(&self) -> Vec<IntentionId> {
        self.intentions.iter().map(Intention::id).collect()
    }

    pub fn runnable(&self) -> impl Iterator<Item = &Intention> {
        self.intentions.iter().filter(|i| i.is_runnable())
    }

    /// Replaces the intention with the same id in place, or appends a new
    /// one. An empty intention is pruned instead of stored.
    pub fn insert(&mut self, intention: Intention) {
        self.next_id = self.next_id.max(intention.id().0 + 1);
        let position = self.position(intention.id());
        match (position, intention.is_empty()) {
            (Some(i), true) => {
                self.intentions.remove(i);
            }
            (Some(i), false) => self.intentions[i] = intention,
            (None, true) => {}
            (None, false) => self.intentions.push_back(intention),
        }
    }

    /// Removes an intention to run it; hand it back with [`requeue`](Self::requeue).
    pub fn take(&mut self, id: IntentionId) -> Option<Intention> {
        self.position(id).and_then(|i| self.intentions.remove(i))
    }

    /// Puts an intention back at the tail, pruning it if its stack is empty.
    pub fn requeue(&mut self, intention: Intention) {
        if intention.is_empty() {
            debug!(intention_id = %intention.id(), "Pruned empty intention");
            return;
        }
        self.intentions.push_back(intention);
    }

    pub fn remove(&mut self, id: IntentionId) -> Option<Intention> {
        self.take(id)
    }

    pub fn get_mut(&mut self, id: IntentionId) -> Option<&mut Intention> {
        self.intentions.iter_mut().find(|i| i.id() == id)
    }

    fn position(&self, id: IntentionId) -> Option<usize> {
        self.intentions.iter().position(|i| i.id() == id)
    }
}

/// What `run_intention` needs from the agent.
pub struct StepContext<'a> {
    pub agent: &'a AgentContext,
    pub beliefs: &'a BeliefBase,
    pub actions: &'a ActionRegistry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step succeeded and the intention has work left
    Progressed,
    /// The step succeeded and emptied the stack
    Completed,
    /// The step raised a sub-goal and the intention waits for it
    Suspended { waiting_for: Trigger },
    /// The step failed; a failure event is rooted at the intention
    Failed { reason: String },
    /// The step failed and the intention has no frames left
    Abandoned { reason: String },
}

#[derive(Debug, Clone)]
pub struct IntentionStep {
    pub intention: Intention,
    pub outcome: StepOutcome,
    pub agent_changes: Vec<AgentChange>,
    pub environment_changes: Vec<EnvironmentChange>,
}

/// Executes exactly one goal of the top frame of `intention`.
///
/// Effects are returned for the caller to apply; the belief base in `step`
/// is only read.
pub fn run_intention(mut intention: Intention, step: &StepContext<'_>) -> Result<IntentionStep> {
    let id = intention.id();
    if intention.is_empty() {
        return Err(AgentError::EmptyIntention(id));
    }
    if !intention.is_runnable() {
        return Err(AgentError::IntentionNotRunnable(id));
    }

    let mut agent_changes = Vec::new();
    let mut environment_changes = Vec::new();

    let goal = intention.top_mut().and_then(ActivationRecord::next_goal);
    let failure = match goal {
        None => None,
        Some(goal) => {
            debug!(
                agent_id = %step.agent.agent_id(),
                intention_id = %id,
                goal = %goal,
                "Executing goal"
            );
            execute_goal(
                &mut intention,
                goal,
                step,
                &mut agent_changes,
                &mut environment_changes,
            )
        }
    };

    let outcome = match failure {
        Some(reason) => {
            warn!(
                agent_id = %step.agent.agent_id(),
                intention_id = %id,
                reason = %reason,
                "Plan step failed"
            );
            match intention.fail_top() {
                FrameFailure::Raised(event) => {
                    agent_changes.push(AgentChange::RaiseEvent(event));
                    StepOutcome::Failed { reason }
                }
                FrameFailure::Abandoned(event) => {
                    agent_changes.extend(event.map(AgentChange::RaiseEvent));
                    StepOutcome::Abandoned { reason }
                }
            }
        }
        None => match intention.status().clone() {
            IntentionStatus::Suspended { waiting_for } => StepOutcome::Suspended { waiting_for },
            IntentionStatus::Runnable => {
                intention.pop_exhausted();
                if intention.is_empty() {
                    StepOutcome::Completed
                } else {
                    StepOutcome::Progressed
                }
            }
        },
    };

    Ok(IntentionStep {
        intention,
        outcome,
        agent_changes,
        environment_changes,
    })
}

/// Runs `goal` against the top frame. Returns the failure reason, if any.
fn execute_goal(
    intention: &mut Intention,
    goal: Goal,
    step: &StepContext<'_>,
    agent_changes: &mut Vec<AgentChange>,
    environment_changes: &mut Vec<EnvironmentChange>,
) -> Option<String> {
    let id = intention.id();
    match goal {
        Goal::AddBelief(term) => agent_changes.push(AgentChange::AddBelief(Belief::new(term))),
        Goal::RemoveBelief(term) => {
            let target = match step.beliefs.retrieve(&term) {
                Some((belief, substitution)) => {
                    extend_top(intention, &substitution);
                    belief
                }
                None => Belief::new(term),
            };
            agent_changes.push(AgentChange::RemoveBelief(target));
        }
        Goal::UpdateBelief(term) => {
            agent_changes.push(AgentChange::UpdateBelief(Belief::new(term)))
        }
        Goal::Test(term) => match step.beliefs.retrieve(&term) {
            Some((_, substitution)) => extend_top(intention, &substitution),
            None => {
                let event = Event::test_goal(term, Some(id));
                intention.suspend(event.trigger().clone());
                agent_changes.push(AgentChange::RaiseEvent(event));
            }
        },
        Goal::Achieve(term) => {
            let event = Event::achievement_goal(term, Some(id));
            intention.suspend(event.trigger().clone());
            agent_changes.push(AgentChange::RaiseEvent(event));
        }
        Goal::Act { name, args } => {
            let request = ActionRequest {
                context: step.agent,
                intention: id,
                arguments: args,
                beliefs: step.beliefs,
            };
            match step.actions.execute(&name, &request) {
                Ok(response) => {
                    extend_top(intention, &response.substitution);
                    let (agent, environment) = effects::partition(response.effects);
                    agent_changes.extend(agent);
                    environment_changes.extend(environment);
                }
                Err(e) => return Some(e.to_string()),
            }
        }
    }
    None
}

fn extend_top(intention: &mut Intention, substitution: &Substitution) {
    if let Some(frame) = intention.top_mut() {
        frame.extend(substitution);
    }
}
