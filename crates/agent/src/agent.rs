//! The agent and its reasoning cycle.
//!
//! One call to [`Agent::reason`] is one cycle: fold messages and perceptions
//! into the belief base, handle exactly one event, then advance exactly one
//! intention by one step. Changes to the agent itself are applied before
//! `reason` returns; changes to the shared environment are handed back in the
//! [`CycleReport`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use bdi_core::{SyntacticUnifier, Term, Unifier};

use crate::actions::{Action, ActionRegistry};
use crate::beliefs::{Belief, BeliefBase};
use crate::config::{AgentConfig, DroppedEventDiagnostics};
use crate::context::AgentContext;
use crate::effects::{AgentChange, EnvironmentChange};
use crate::error::{AgentError, Result};
use crate::events::{Event, EventQueue};
use crate::intention::{
    run_intention, FrameFailure, Intention, IntentionPool, StepContext, StepOutcome,
};
use crate::plans::{Plan, PlanId, PlanLibrary};
use crate::policy::Policies;
use crate::types::{AgentId, IntentionId, Message, Performative};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NoRelevantPlan,
    NoApplicablePlan,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NoRelevantPlan => f.write_str("no relevant plan"),
            DropReason::NoApplicablePlan => f.write_str("no applicable plan"),
        }
    }
}

/// What happened to the event selected in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventHandling {
    /// The event queue was empty
    Idle,
    /// A plan for the event was committed to an intention
    Assigned { intention: IntentionId, plan: PlanId },
    /// The event was discarded, possibly raising a failure event
    Dropped { reason: DropReason, raised: Option<Event> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub intention: IntentionId,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub event: Option<Event>,
    pub handling: EventHandling,
    pub execution: Option<Execution>,
    pub environment_changes: Vec<EnvironmentChange>,
}

impl CycleReport {
    /// Nothing was handled and nothing ran.
    pub fn is_noop(&self) -> bool {
        self.event.is_none() && self.execution.is_none()
    }
}

#[derive(Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    beliefs: BeliefBase,
    events: EventQueue,
    plans: PlanLibrary,
    intentions: IntentionPool,
    actions: ActionRegistry,
    policies: Policies,
    config: Arc<AgentConfig>,
    cycle: u64,
}

impl Agent {
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beliefs(&self) -> &BeliefBase {
        &self.beliefs
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn plans(&self) -> &PlanLibrary {
        &self.plans
    }

    pub fn intentions(&self) -> &IntentionPool {
        &self.intentions
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// No queued events and no runnable intentions: another cycle without
    /// new input would do nothing.
    pub fn is_idle(&self) -> bool {
        self.events.is_empty() && self.intentions.runnable().next().is_none()
    }

    pub fn add_plan(&mut self, plan: Plan) {
        self.plans.add(plan);
    }

    pub fn register_action(&mut self, action: Arc<dyn Action>) {
        self.actions.register(action);
    }

    /// Queues an external achievement goal.
    pub fn post_goal(&mut self, goal: Term) {
        self.events.enqueue(Event::achievement_goal(goal, None));
    }

    pub fn enqueue(&mut self, event: Event) {
        self.events.enqueue(event);
    }

    pub fn context(&self) -> AgentContext {
        AgentContext::new(
            self.id,
            self.name.clone(),
            self.cycle,
            Arc::clone(&self.config),
            Arc::clone(self.beliefs.unifier()),
        )
    }

    /// Runs one reasoning cycle over the given perceptions and delivered messages.
    pub fn reason(&mut self, perceptions: &BeliefBase, inbox: Vec<Message>) -> Result<CycleReport> {
        self.cycle += 1;
        let ctx = self.context();
        // Intentions committed during this cycle first run in the next one.
        let scheduled_pool = self.intentions.clone();

        for message in inbox {
            self.receive(message);
        }

        let update = self.policies.update_belief(&ctx, perceptions, &self.beliefs);
        self.beliefs = update.beliefs;
        self.events
            .enqueue_all(update.removed.iter().map(Event::belief_base_removal));
        self.events
            .enqueue_all(update.added.iter().map(Event::belief_base_addition));

        let event = self
            .policies
            .select_event(&ctx, &self.events)
            .and_then(|index| self.events.dequeue_selected(index));

        let handling = match &event {
            Some(event) => {
                debug!(agent_id = %self.id, cycle = self.cycle, event = %event, "Selected event");
                self.handle_event(&ctx, event)?
            }
            None => EventHandling::Idle,
        };

        let (execution, environment_changes) = self.execute_intention(&ctx, &scheduled_pool)?;

        Ok(CycleReport {
            cycle: self.cycle,
            event,
            handling,
            execution,
            environment_changes,
        })
    }

    fn receive(&mut self, message: Message) {
        debug!(agent_id = %self.id, message = %message, "Received message");
        let belief = Belief::new(message.content.clone());
        match message.performative {
            Performative::Tell => {
                let mut added = Vec::new();
                self.beliefs = self.beliefs.add(belief, |b| added.push(b.clone()));
                self.events
                    .enqueue_all(added.iter().map(Event::belief_base_addition));
            }
            Performative::Untell => {
                let mut removed = Vec::new();
                self.beliefs = self.beliefs.remove(&belief, |b| removed.push(b.clone()));
                self.events
                    .enqueue_all(removed.iter().map(Event::belief_base_removal));
            }
            Performative::Achieve => self.post_goal(message.content),
        }
    }

    fn handle_event(&mut self, ctx: &AgentContext, event: &Event) -> Result<EventHandling> {
        let relevant = self.policies.select_relevant_plans(ctx, event, &self.plans);
        if relevant.is_empty() {
            return self.drop_event(event, DropReason::NoRelevantPlan);
        }

        let applicable: Vec<Plan> = relevant
            .iter()
            .filter(|plan| {
                self.policies
                    .is_plan_applicable(ctx, event, plan, &self.beliefs)
            })
            .cloned()
            .collect();
        let selected = self
            .policies
            .select_applicable_plan(ctx, &applicable)
            .and_then(|index| applicable.get(index));
        let Some(plan) = selected else {
            return self.drop_event(event, DropReason::NoApplicablePlan);
        };

        let instance = match plan.instantiate(event, &self.beliefs) {
            Some(instance) => instance,
            None => plan
                .relevant_substitution(event, ctx.unifier())
                .map(|s| plan.apply(&s))
                .unwrap_or_else(|| plan.clone()),
        };
        let intention = self
            .policies
            .assign_plan_to_intention(ctx, event, &instance, &self.intentions)?;
        self.check_assignment(event, &intention)?;

        let id = intention.id();
        debug!(agent_id = %self.id, intention_id = %id, plan = %plan, "Committed plan");
        self.intentions.insert(intention);
        Ok(EventHandling::Assigned {
            intention: id,
            plan: plan.id(),
        })
    }

    /// Rejects assignments that do not route the event the way the event
    /// kind requires.
    fn check_assignment(&self, event: &Event, intention: &Intention) -> Result<()> {
        if intention.is_empty() {
            return Err(AgentError::EmptyIntention(intention.id()));
        }
        match event.intention() {
            None if self.intentions.contains(intention.id()) => {
                Err(AgentError::MisroutedAssignment {
                    intention: intention.id(),
                    reason: format!("external event {} must start a new intention", event),
                })
            }
            None => Ok(()),
            Some(owner) if owner != intention.id() => Err(AgentError::MisroutedAssignment {
                intention: intention.id(),
                reason: format!("internal event {} belongs to {}", event, owner),
            }),
            Some(owner) => {
                let previous = self
                    .intentions
                    .get(owner)
                    .ok_or(AgentError::IntentionNotFound(owner))?;
                let frames = intention.frames();
                let preserved = frames.len() == previous.depth() + 1
                    && frames[..previous.depth()] == *previous.frames();
                if preserved {
                    Ok(())
                } else {
                    Err(AgentError::MisroutedAssignment {
                        intention: owner,
                        reason: "frames beneath the new frame were not preserved".to_string(),
                    })
                }
            }
        }
    }

    fn drop_event(&mut self, event: &Event, reason: DropReason) -> Result<EventHandling> {
        match self.config.dropped_events {
            DroppedEventDiagnostics::Warn => {
                warn!(agent_id = %self.id, event = %event, reason = %reason, "Dropped event")
            }
            DroppedEventDiagnostics::Silent => {
                debug!(agent_id = %self.id, event = %event, reason = %reason, "Dropped event")
            }
        }

        let Some(id) = event.intention() else {
            return Ok(EventHandling::Dropped { reason, raised: None });
        };
        let intention = self
            .intentions
            .get_mut(id)
            .ok_or(AgentError::IntentionNotFound(id))?;
        let trigger = event.trigger();

        let raised = if trigger.is_goal_failure() {
            // An unhandled failure fails the frame that was waiting on the goal.
            match intention.fail_top() {
                FrameFailure::Raised(failure) => Some(failure),
                FrameFailure::Abandoned(failure) => {
                    debug!(agent_id = %self.id, intention_id = %id, "Abandoned intention");
                    self.intentions.remove(id);
                    failure
                }
            }
        } else if let (DropReason::NoApplicablePlan, Some(failure)) = (reason, trigger.failure()) {
            intention.suspend(failure.clone());
            Some(Event::internal(failure, id))
        } else {
            intention.resume();
            None
        };

        if let Some(failure) = &raised {
            self.events.enqueue(failure.clone());
        }
        Ok(EventHandling::Dropped { reason, raised })
    }

    fn execute_intention(
        &mut self,
        ctx: &AgentContext,
        scheduled_pool: &IntentionPool,
    ) -> Result<(Option<Execution>, Vec<EnvironmentChange>)> {
        let Some(id) = self.policies.schedule_intention(ctx, scheduled_pool) else {
            return Ok((None, Vec::new()));
        };
        match scheduled_pool.get(id) {
            None => return Err(AgentError::IntentionNotFound(id)),
            Some(intention) if intention.is_empty() => return Err(AgentError::EmptyIntention(id)),
            Some(intention) if !intention.is_runnable() => {
                return Err(AgentError::IntentionNotRunnable(id))
            }
            Some(_) => {}
        }
        let Some(intention) = self.intentions.take(id) else {
            debug!(
                agent_id = %self.id,
                intention_id = %id,
                "Scheduled intention left the pool this cycle"
            );
            return Ok((None, Vec::new()));
        };
        if !intention.is_runnable() {
            self.intentions.insert(intention);
            return Ok((None, Vec::new()));
        }

        let step = run_intention(
            intention,
            &StepContext {
                agent: ctx,
                beliefs: &self.beliefs,
                actions: &self.actions,
            },
        )?;
        debug!(
            agent_id = %self.id,
            intention_id = %id,
            outcome = ?step.outcome,
            "Ran intention"
        );
        self.intentions.requeue(step.intention);
        self.apply_agent_changes(step.agent_changes);

        Ok((
            Some(Execution {
                intention: id,
                outcome: step.outcome,
            }),
            step.environment_changes,
        ))
    }

    /// Applies changes in order. Belief changes raise external events.
    pub fn apply_agent_changes(&mut self, changes: impl IntoIterator<Item = AgentChange>) {
        for change in changes {
            match change {
                AgentChange::AddBelief(belief) => {
                    let mut added = Vec::new();
                    self.beliefs = self.beliefs.add(belief, |b| added.push(b.clone()));
                    self.events
                        .enqueue_all(added.iter().map(Event::belief_base_addition));
                }
                AgentChange::RemoveBelief(belief) => {
                    let mut removed = Vec::new();
                    self.beliefs = self.beliefs.remove(&belief, |b| removed.push(b.clone()));
                    self.events
                        .enqueue_all(removed.iter().map(Event::belief_base_removal));
                }
                AgentChange::UpdateBelief(belief) => {
                    let mut added = Vec::new();
                    self.beliefs = self
                        .beliefs
                        .update(belief, |_| {}, |b| added.push(b.clone()));
                    self.events
                        .enqueue_all(added.iter().map(Event::belief_base_update));
                }
                AgentChange::RaiseEvent(event) => self.events.enqueue(event),
                AgentChange::DropIntention(id) => {
                    if self.intentions.remove(id).is_some() {
                        let discarded = self.events.discard_for(id);
                        debug!(
                            agent_id = %self.id,
                            intention_id = %id,
                            discarded,
                            "Dropped intention"
                        );
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cycle", &self.cycle)
            .field("beliefs", &self.beliefs.to_string())
            .field("events", &self.events.len())
            .field("intentions", &self.intentions.ids())
            .finish()
    }
}

pub struct AgentBuilder {
    name: String,
    id: Option<AgentId>,
    beliefs: Vec<Belief>,
    plans: Vec<Plan>,
    goals: Vec<Term>,
    actions: Vec<Arc<dyn Action>>,
    policies: Policies,
    config: AgentConfig,
    unifier: Arc<dyn Unifier>,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            beliefs: Vec::new(),
            plans: Vec::new(),
            goals: Vec::new(),
            actions: Vec::new(),
            policies: Policies::default(),
            config: AgentConfig::default(),
            unifier: Arc::new(SyntacticUnifier::default()),
        }
    }

    /// Overrides the id derived from the agent's name.
    pub fn id(mut self, id: AgentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn belief(mut self, belief: impl Into<Belief>) -> Self {
        self.beliefs.push(belief.into());
        self
    }

    pub fn beliefs(mut self, beliefs: impl IntoIterator<Item = Belief>) -> Self {
        self.beliefs.extend(beliefs);
        self
    }

    pub fn plan(mut self, plan: Plan) -> Self {
        self.plans.push(plan);
        self
    }

    pub fn plans(mut self, plans: impl IntoIterator<Item = Plan>) -> Self {
        self.plans.extend(plans);
        self
    }

    /// Initial achievement goal, queued as an external event.
    pub fn goal(mut self, goal: Term) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn policies(mut self, policies: Policies) -> Self {
        self.policies = policies;
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn unifier(mut self, unifier: Arc<dyn Unifier>) -> Self {
        self.unifier = unifier;
        self
    }

    pub fn build(self) -> Agent {
        let mut actions = if self.config.register_builtins {
            ActionRegistry::with_builtins()
        } else {
            ActionRegistry::new()
        };
        self.actions.into_iter().for_each(|a| actions.register(a));

        Agent {
            id: self.id.unwrap_or_else(|| AgentId::named(&self.name)),
            beliefs: BeliefBase::with_unifier(self.unifier).add_all(self.beliefs, |_| {}),
            events: self
                .goals
                .into_iter()
                .map(|g| Event::achievement_goal(g, None))
                .collect(),
            plans: PlanLibrary::of(self.plans),
            intentions: IntentionPool::new(),
            actions,
            policies: self.policies,
            config: Arc::new(self.config),
            cycle: 0,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Trigger;
    use crate::goals::{Goal, Guard};
    use crate::intention::ActivationRecord;

    fn atom(name: &str) -> Term {
        Term::atom(name)
    }

    fn achieve(name: &str) -> Trigger {
        Trigger::AchievementGoalInvocation(atom(name))
    }

    #[test]
    fn test_event_without_plans_is_dropped() {
        let mut agent = Agent::builder("lonely").goal(atom("wander")).build();
        let report = agent.reason(&BeliefBase::empty(), vec![]).unwrap();

        assert_eq!(
            report.handling,
            EventHandling::Dropped {
                reason: DropReason::NoRelevantPlan,
                raised: None
            }
        );
        assert!(agent.events().is_empty());
        assert!(agent.intentions().is_empty());
        assert!(agent.beliefs().is_empty());
        assert!(agent.is_idle());
    }

    #[test]
    fn test_builder_takes_terms_and_beliefs() {
        let agent = Agent::builder("collector")
            .belief(atom("raw"))
            .belief(Belief::new(atom("wrapped")))
            .build();
        assert!(agent.beliefs().contains(&Belief::new(atom("raw"))));
        assert!(agent.beliefs().contains(&Belief::new(atom("wrapped"))));
        // initial beliefs raise no events
        assert!(agent.events().is_empty());
    }

    #[test]
    fn test_committed_intention_runs_next_cycle() {
        let mut agent = Agent::builder("worker")
            .plan(Plan::on(achieve("work"), [Goal::add_belief(atom("worked"))]))
            .goal(atom("work"))
            .build();

        let first = agent.reason(&BeliefBase::empty(), vec![]).unwrap();
        assert!(matches!(first.handling, EventHandling::Assigned { .. }));
        assert!(first.execution.is_none());
        assert_eq!(agent.intentions().len(), 1);

        let second = agent.reason(&BeliefBase::empty(), vec![]).unwrap();
        assert_eq!(
            second.execution.map(|e| e.outcome),
            Some(StepOutcome::Completed)
        );
        assert!(agent.beliefs().contains(&Belief::new(atom("worked"))));
        assert!(agent.intentions().is_empty());
    }

    #[test]
    fn test_inbox_messages_become_events() {
        let sender = AgentId::named("boss");
        let mut agent = Agent::builder("worker").build();
        agent
            .reason(
                &BeliefBase::empty(),
                vec![
                    Message::tell(sender, atom("sunny")),
                    Message::achieve(sender, atom("work")),
                ],
            )
            .unwrap();
        assert!(agent.beliefs().contains(&Belief::new(atom("sunny"))));
        // the addition event was handled (and dropped) this cycle
        let pending: Vec<_> = agent.events().iter().cloned().collect();
        assert_eq!(pending, vec![Event::achievement_goal(atom("work"), None)]);

        agent
            .reason(&BeliefBase::empty(), vec![Message::untell(sender, atom("sunny"))])
            .unwrap();
        assert!(agent.beliefs().is_empty());
    }

    #[test]
    fn test_unhandled_subgoal_failure_abandons_intention() {
        let mut agent = Agent::builder("worker")
            .plan(Plan::on(achieve("outer"), [Goal::achieve(atom("inner"))]))
            .plan(Plan::new(achieve("inner"), Guard::holds(atom("ready")), []))
            .goal(atom("outer"))
            .build();
        let empty = BeliefBase::empty();

        // +!outer committed, then run: raises +!inner
        agent.reason(&empty, vec![]).unwrap();
        let report = agent.reason(&empty, vec![]).unwrap();
        assert!(matches!(
            report.execution.map(|e| e.outcome),
            Some(StepOutcome::Suspended { .. })
        ));
        let owner = agent.intentions().ids()[0];

        // +!inner has a plan whose guard fails: -!inner rooted at the owner
        let report = agent.reason(&empty, vec![]).unwrap();
        assert_eq!(
            report.handling,
            EventHandling::Dropped {
                reason: DropReason::NoApplicablePlan,
                raised: Some(Event::internal(
                    Trigger::AchievementGoalFailure(atom("inner")),
                    owner
                )),
            }
        );
        assert_eq!(agent.intentions().len(), 1);

        // nobody handles -!inner: the waiting frame fails and the stack empties
        let report = agent.reason(&empty, vec![]).unwrap();
        assert!(matches!(report.handling, EventHandling::Dropped { .. }));
        assert!(agent.intentions().is_empty());
        let pending: Vec<_> = agent.events().iter().cloned().collect();
        assert_eq!(
            pending,
            vec![Event::external(Trigger::AchievementGoalFailure(atom("outer")))]
        );
    }

    #[test]
    fn test_failure_handler_resumes_caller() {
        let mut agent = Agent::builder("worker")
            .plan(Plan::on(
                achieve("outer"),
                [Goal::achieve(atom("inner")), Goal::add_belief(atom("after"))],
            ))
            .plan(Plan::on(achieve("inner"), [Goal::act("fail", [])]))
            .plan(Plan::on(
                Trigger::AchievementGoalFailure(atom("inner")),
                [Goal::add_belief(atom("recovered"))],
            ))
            .goal(atom("outer"))
            .build();
        let empty = BeliefBase::empty();
        for _ in 0..12 {
            agent.reason(&empty, vec![]).unwrap();
        }
        assert!(agent.beliefs().contains(&Belief::new(atom("recovered"))));
        assert!(agent.beliefs().contains(&Belief::new(atom("after"))));
        assert!(agent.intentions().is_empty());
    }

    #[test]
    fn test_external_event_reusing_intention_is_rejected() {
        let policies = Policies::default().with_assign_plan_to_intention(|_, event, plan, _| {
            Ok(Intention::new(
                IntentionId(99),
                ActivationRecord::new(plan, event.trigger().clone()),
            ))
        });
        let mut agent = Agent::builder("worker")
            .plan(Plan::on(achieve("a"), [Goal::add_belief(atom("x"))]))
            .plan(Plan::on(achieve("b"), [Goal::add_belief(atom("y"))]))
            .policies(policies)
            .goal(atom("a"))
            .goal(atom("b"))
            .build();
        let empty = BeliefBase::empty();
        agent.reason(&empty, vec![]).unwrap();
        assert!(matches!(
            agent.reason(&empty, vec![]),
            Err(AgentError::MisroutedAssignment { intention: IntentionId(99), .. })
        ));
    }

    #[test]
    fn test_internal_event_on_fresh_intention_is_rejected() {
        let policies = Policies::default().with_assign_plan_to_intention(|_, event, plan, pool| {
            Ok(Intention::new(
                pool.fresh_id(),
                ActivationRecord::new(plan, event.trigger().clone()),
            ))
        });
        let mut agent = Agent::builder("worker")
            .plan(Plan::on(achieve("outer"), [Goal::achieve(atom("inner"))]))
            .plan(Plan::on(achieve("inner"), []))
            .policies(policies)
            .goal(atom("outer"))
            .build();
        let empty = BeliefBase::empty();
        agent.reason(&empty, vec![]).unwrap();
        agent.reason(&empty, vec![]).unwrap();
        assert!(matches!(
            agent.reason(&empty, vec![]),
            Err(AgentError::MisroutedAssignment { .. })
        ));
    }

    #[test]
    fn test_intentions_round_robin() {
        let mut agent = Agent::builder("juggler")
            .plan(Plan::on(
                achieve("a"),
                [Goal::add_belief(atom("a1")), Goal::add_belief(atom("a2"))],
            ))
            .plan(Plan::on(
                achieve("b"),
                [Goal::add_belief(atom("b1")), Goal::add_belief(atom("b2"))],
            ))
            .goal(atom("a"))
            .goal(atom("b"))
            .build();
        let empty = BeliefBase::empty();
        let mut ran = Vec::new();
        for _ in 0..6 {
            let report = agent.reason(&empty, vec![]).unwrap();
            ran.extend(report.execution.map(|e| e.intention));
        }
        assert_eq!(
            ran,
            vec![IntentionId(0), IntentionId(1), IntentionId(0), IntentionId(1)]
        );
    }

    #[test]
    fn test_agent_changes_raise_events() {
        let mut agent = Agent::builder("worker").build();
        agent.apply_agent_changes([
            AgentChange::AddBelief(Belief::new(Term::structure("count", [Term::int(1)]))),
            AgentChange::UpdateBelief(Belief::new(Term::structure("count", [Term::int(2)]))),
        ]);
        assert_eq!(agent.beliefs().len(), 1);
        let kinds: Vec<_> = agent.events().iter().map(|e| e.trigger().kind()).collect();
        assert_eq!(
            kinds,
            vec![
                crate::events::TriggerKind::BeliefBaseAddition,
                crate::events::TriggerKind::BeliefBaseUpdate
            ]
        );
    }
}
