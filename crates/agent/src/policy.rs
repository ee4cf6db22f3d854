//! Pluggable decision points of the reasoning cycle.
//!
//! Each hook is a plain function value with a deterministic default. Custom
//! hooks replace one decision at a time through the `with_*` builders; the
//! cycle re-checks the results of the hooks that could break its invariants.

use std::fmt;
use std::sync::Arc;

use crate::beliefs::{BeliefBase, BeliefUpdate};
use crate::context::AgentContext;
use crate::error::{AgentError, Result};
use crate::events::{Event, EventQueue};
use crate::intention::{ActivationRecord, Intention, IntentionPool};
use crate::plans::{Plan, PlanLibrary};
use crate::types::IntentionId;

pub type UpdateBeliefFn =
    Arc<dyn Fn(&AgentContext, &BeliefBase, &BeliefBase) -> BeliefUpdate + Send + Sync>;
pub type SelectEventFn = Arc<dyn Fn(&AgentContext, &EventQueue) -> Option<usize> + Send + Sync>;
pub type SelectRelevantPlansFn =
    Arc<dyn Fn(&AgentContext, &Event, &PlanLibrary) -> PlanLibrary + Send + Sync>;
pub type IsPlanApplicableFn =
    Arc<dyn Fn(&AgentContext, &Event, &Plan, &BeliefBase) -> bool + Send + Sync>;
pub type SelectApplicablePlanFn =
    Arc<dyn Fn(&AgentContext, &[Plan]) -> Option<usize> + Send + Sync>;
pub type AssignPlanFn =
    Arc<dyn Fn(&AgentContext, &Event, &Plan, &IntentionPool) -> Result<Intention> + Send + Sync>;
pub type ScheduleIntentionFn =
    Arc<dyn Fn(&AgentContext, &IntentionPool) -> Option<IntentionId> + Send + Sync>;

#[derive(Clone)]
pub struct Policies {
    update_belief: UpdateBeliefFn,
    select_event: SelectEventFn,
    select_relevant_plans: SelectRelevantPlansFn,
    is_plan_applicable: IsPlanApplicableFn,
    select_applicable_plan: SelectApplicablePlanFn,
    assign_plan_to_intention: AssignPlanFn,
    schedule_intention: ScheduleIntentionFn,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            update_belief: Arc::new(update_belief),
            select_event: Arc::new(select_event),
            select_relevant_plans: Arc::new(select_relevant_plans),
            is_plan_applicable: Arc::new(is_plan_applicable),
            select_applicable_plan: Arc::new(select_applicable_plan),
            assign_plan_to_intention: Arc::new(assign_plan_to_intention),
            schedule_intention: Arc::new(schedule_intention),
        }
    }
}

impl Policies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_belief<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &BeliefBase, &BeliefBase) -> BeliefUpdate + Send + Sync + 'static,
    {
        self.update_belief = Arc::new(f);
        self
    }

    pub fn with_select_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &EventQueue) -> Option<usize> + Send + Sync + 'static,
    {
        self.select_event = Arc::new(f);
        self
    }

    pub fn with_select_relevant_plans<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &Event, &PlanLibrary) -> PlanLibrary + Send + Sync + 'static,
    {
        self.select_relevant_plans = Arc::new(f);
        self
    }

    pub fn with_is_plan_applicable<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &Event, &Plan, &BeliefBase) -> bool + Send + Sync + 'static,
    {
        self.is_plan_applicable = Arc::new(f);
        self
    }

    pub fn with_select_applicable_plan<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &[Plan]) -> Option<usize> + Send + Sync + 'static,
    {
        self.select_applicable_plan = Arc::new(f);
        self
    }

    pub fn with_assign_plan_to_intention<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &Event, &Plan, &IntentionPool) -> Result<Intention>
            + Send
            + Sync
            + 'static,
    {
        self.assign_plan_to_intention = Arc::new(f);
        self
    }

    pub fn with_schedule_intention<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentContext, &IntentionPool) -> Option<IntentionId> + Send + Sync + 'static,
    {
        self.schedule_intention = Arc::new(f);
        self
    }

    pub fn update_belief(
        &self,
        ctx: &AgentContext,
        perceptions: &BeliefBase,
        beliefs: &BeliefBase,
    ) -> BeliefUpdate {
        (self.update_belief)(ctx, perceptions, beliefs)
    }

    pub fn select_event(&self, ctx: &AgentContext, queue: &EventQueue) -> Option<usize> {
        (self.select_event)(ctx, queue)
    }

    pub fn select_relevant_plans(
        &self,
        ctx: &AgentContext,
        event: &Event,
        library: &PlanLibrary,
    ) -> PlanLibrary {
        (self.select_relevant_plans)(ctx, event, library)
    }

    pub fn is_plan_applicable(
        &self,
        ctx: &AgentContext,
        event: &Event,
        plan: &Plan,
        beliefs: &BeliefBase,
    ) -> bool {
        (self.is_plan_applicable)(ctx, event, plan, beliefs)
    }

    pub fn select_applicable_plan(&self, ctx: &AgentContext, plans: &[Plan]) -> Option<usize> {
        (self.select_applicable_plan)(ctx, plans)
    }

    pub fn assign_plan_to_intention(
        &self,
        ctx: &AgentContext,
        event: &Event,
        plan: &Plan,
        pool: &IntentionPool,
    ) -> Result<Intention> {
        (self.assign_plan_to_intention)(ctx, event, plan, pool)
    }

    pub fn schedule_intention(
        &self,
        ctx: &AgentContext,
        pool: &IntentionPool,
    ) -> Option<IntentionId> {
        (self.schedule_intention)(ctx, pool)
    }
}

impl fmt::Debug for Policies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policies").finish_non_exhaustive()
    }
}

/// Adds every perceived belief; nothing is ever removed.
pub fn update_belief(
    _ctx: &AgentContext,
    perceptions: &BeliefBase,
    beliefs: &BeliefBase,
) -> BeliefUpdate {
    let mut added = Vec::new();
    let beliefs = beliefs.add_all(perceptions.iter().cloned(), |b| added.push(b.clone()));
    BeliefUpdate {
        beliefs,
        added,
        removed: Vec::new(),
    }
}

/// Head of the queue.
pub fn select_event(_ctx: &AgentContext, queue: &EventQueue) -> Option<usize> {
    if queue.is_empty() {
        None
    } else {
        Some(0)
    }
}

pub fn select_relevant_plans(
    ctx: &AgentContext,
    event: &Event,
    library: &PlanLibrary,
) -> PlanLibrary {
    library.relevant_to(event, ctx.unifier())
}

pub fn is_plan_applicable(
    _ctx: &AgentContext,
    event: &Event,
    plan: &Plan,
    beliefs: &BeliefBase,
) -> bool {
    plan.is_applicable(event, beliefs)
}

/// First applicable plan in library order.
pub fn select_applicable_plan(_ctx: &AgentContext, plans: &[Plan]) -> Option<usize> {
    if plans.is_empty() {
        None
    } else {
        Some(0)
    }
}

/// External events start a new intention; internal events push a frame on
/// the intention that raised them.
pub fn assign_plan_to_intention(
    _ctx: &AgentContext,
    event: &Event,
    plan: &Plan,
    pool: &IntentionPool,
) -> Result<Intention> {
    let record = ActivationRecord::new(plan, event.trigger().clone());
    match event.intention() {
        None => Ok(Intention::new(pool.fresh_id(), record)),
        Some(id) => {
            let mut intention = pool.get(id).cloned().ok_or(AgentError::IntentionNotFound(id))?;
            intention.push(record);
            Ok(intention)
        }
    }
}

/// First runnable intention in pool order. The cycle moves each executed
/// intention to the back of the pool, so this is round robin.
pub fn schedule_intention(_ctx: &AgentContext, pool: &IntentionPool) -> Option<IntentionId> {
    pool.runnable().next().map(Intention::id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdi_core::{SyntacticUnifier, Term};

    use crate::beliefs::Belief;
    use crate::config::AgentConfig;
    use crate::events::Trigger;
    use crate::types::AgentId;

    fn context() -> AgentContext {
        AgentContext::new(
            AgentId::named("tester"),
            "tester",
            1,
            Arc::new(AgentConfig::default()),
            Arc::new(SyntacticUnifier::new()),
        )
    }

    fn plan(goal: &str) -> Plan {
        Plan::on(Trigger::AchievementGoalInvocation(Term::atom(goal)), [])
    }

    #[test]
    fn test_default_update_adds_perceptions() {
        let ctx = context();
        let beliefs = BeliefBase::of([Belief::new(Term::atom("a"))]);
        let perceptions =
            BeliefBase::of([Belief::new(Term::atom("a")), Belief::new(Term::atom("b"))]);
        let update = Policies::default().update_belief(&ctx, &perceptions, &beliefs);
        assert_eq!(update.added, vec![Belief::new(Term::atom("b"))]);
        assert_eq!(update.beliefs.len(), 2);
        assert!(update.removed.is_empty());
    }

    #[test]
    fn test_external_assignment_uses_fresh_id() {
        let ctx = context();
        let mut pool = IntentionPool::new();
        let event = Event::achievement_goal(Term::atom("a"), None);
        let first = assign_plan_to_intention(&ctx, &event, &plan("a"), &pool).unwrap();
        pool.insert(first.clone());
        let second = assign_plan_to_intention(&ctx, &event, &plan("a"), &pool).unwrap();
        assert_ne!(first.id(), second.id());
        assert!(!pool.contains(second.id()));
        assert_eq!(second.depth(), 1);
    }

    #[test]
    fn test_internal_assignment_routes_to_owner() {
        let ctx = context();
        let mut pool = IntentionPool::new();
        let root = assign_plan_to_intention(
            &ctx,
            &Event::achievement_goal(Term::atom("a"), None),
            &plan("a"),
            &pool,
        )
        .unwrap();
        let other = Intention::new(
            IntentionId(root.id().0 + 1),
            ActivationRecord::new(&plan("z"), Trigger::AchievementGoalInvocation(Term::atom("z"))),
        );
        pool.insert(root.clone());
        pool.insert(other.clone());

        let event = Event::achievement_goal(Term::atom("b"), Some(root.id()));
        let assigned = assign_plan_to_intention(&ctx, &event, &plan("b"), &pool).unwrap();
        assert_eq!(assigned.id(), root.id());
        assert_eq!(assigned.depth(), 2);
        assert_eq!(assigned.frames()[0], root.frames()[0]);
        assert_eq!(pool.get(other.id()), Some(&other));
    }

    #[test]
    fn test_internal_assignment_to_missing_intention() {
        let ctx = context();
        let event = Event::achievement_goal(Term::atom("b"), Some(IntentionId(42)));
        assert!(matches!(
            assign_plan_to_intention(&ctx, &event, &plan("b"), &IntentionPool::new()),
            Err(AgentError::IntentionNotFound(IntentionId(42)))
        ));
    }

    #[test]
    fn test_schedule_skips_suspended() {
        let ctx = context();
        let mut pool = IntentionPool::new();
        let mut waiting = Intention::new(
            IntentionId(0),
            ActivationRecord::new(&plan("a"), Trigger::AchievementGoalInvocation(Term::atom("a"))),
        );
        waiting.suspend(Trigger::AchievementGoalInvocation(Term::atom("sub")));
        let ready = Intention::new(
            IntentionId(1),
            ActivationRecord::new(&plan("b"), Trigger::AchievementGoalInvocation(Term::atom("b"))),
        );
        pool.insert(waiting);
        pool.insert(ready);
        assert_eq!(schedule_intention(&ctx, &pool), Some(IntentionId(1)));
        assert_eq!(schedule_intention(&ctx, &IntentionPool::new()), None);
    }
}
