use serde::{Deserialize, Serialize};
use std::fmt;

use bdi_core::{unify, ContentId, Substitution, Unifier};

use crate::beliefs::BeliefBase;
use crate::events::{Event, Trigger};
use crate::goals::{Goal, Guard};

/// Content fingerprint of a plan: equal plans share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(ContentId);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plan:{}", self.0)
    }
}

/// `trigger : guard <- body`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plan {
    trigger: Trigger,
    guard: Guard,
    body: Vec<Goal>,
}

impl Plan {
    pub fn new(trigger: Trigger, guard: Guard, body: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            trigger,
            guard,
            body: body.into_iter().collect(),
        }
    }

    /// Plan with a trivially true guard.
    pub fn on(trigger: Trigger, body: impl IntoIterator<Item = Goal>) -> Self {
        Self::new(trigger, Guard::always(), body)
    }

    pub fn id(&self) -> PlanId {
        PlanId(ContentId::from_bytes(self.to_string().as_bytes()))
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn body(&self) -> &[Goal] {
        &self.body
    }

    /// Substitution under which this plan's trigger matches `event`:
    /// same trigger kind and unifying terms.
    pub fn relevant_substitution(
        &self,
        event: &Event,
        unifier: &dyn Unifier,
    ) -> Option<Substitution> {
        if self.trigger.kind() != event.trigger().kind() {
            return None;
        }
        unify::matches(unifier, self.trigger.value(), event.trigger().value())
    }

    /// Relevance substitution extended through the guard.
    pub fn applicable_substitution(
        &self,
        event: &Event,
        beliefs: &BeliefBase,
    ) -> Option<Substitution> {
        let relevant = self.relevant_substitution(event, beliefs.unifier().as_ref())?;
        self.guard.solve(beliefs, &relevant)
    }

    pub fn is_applicable(&self, event: &Event, beliefs: &BeliefBase) -> bool {
        self.applicable_substitution(event, beliefs).is_some()
    }

    /// The plan rewritten under its applicable substitution for `event`.
    pub fn instantiate(&self, event: &Event, beliefs: &BeliefBase) -> Option<Plan> {
        let substitution = self.applicable_substitution(event, beliefs)?;
        Some(self.apply(&substitution))
    }

    pub fn apply(&self, substitution: &Substitution) -> Plan {
        Plan {
            trigger: self.trigger.apply(substitution),
            guard: self.guard.apply(substitution),
            body: self.body.iter().map(|g| g.apply(substitution)).collect(),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} <- ", self.trigger, self.guard)?;
        if self.body.is_empty() {
            return f.write_str("true");
        }
        for (i, goal) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", goal)?;
        }
        Ok(())
    }
}

/// Ordered plan catalog. Library order is the tie-break order for plan selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanLibrary {
    plans: Vec<Plan>,
}

impl PlanLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(plans: impl IntoIterator<Item = Plan>) -> Self {
        let mut library = Self::new();
        plans.into_iter().for_each(|p| library.add(p));
        library
    }

    /// Appends `plan`; a plan identical to an existing one is ignored.
    pub fn add(&mut self, plan: Plan) {
        if !self.plans.contains(&plan) {
            self.plans.push(plan);
        }
    }

    /// Plans whose trigger matches `event`, in library order.
    pub fn relevant_to(&self, event: &Event, unifier: &dyn Unifier) -> PlanLibrary {
        PlanLibrary {
            plans: self
                .plans
                .iter()
                .filter(|p| p.relevant_substitution(event, unifier).is_some())
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Plan> {
        self.plans.get(index)
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }
}

impl FromIterator<Plan> for PlanLibrary {
    fn from_iter<I: IntoIterator<Item = Plan>>(iter: I) -> Self {
        Self::of(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beliefs::Belief;
    use bdi_core::{SyntacticUnifier, Term};

    fn turn(who: Term) -> Term {
        Term::structure("turn", [who])
    }

    fn greet_plan() -> Plan {
        Plan::new(
            Trigger::BeliefBaseAddition(turn(Term::var("W"))),
            Guard::holds(Term::structure("other", [Term::var("Peer")])),
            [Goal::act("send", [Term::var("Peer"), Term::atom("tell"), turn(Term::var("W"))])],
        )
    }

    #[test]
    fn test_relevance_requires_same_kind() {
        let u = SyntacticUnifier::new();
        let plan = Plan::on(Trigger::BeliefBaseAddition(turn(Term::atom("me"))), []);
        let added = Event::external(Trigger::BeliefBaseAddition(turn(Term::atom("me"))));
        let removed = Event::external(Trigger::BeliefBaseRemoval(turn(Term::atom("me"))));
        let other = Event::external(Trigger::BeliefBaseAddition(turn(Term::atom("you"))));
        assert!(plan.relevant_substitution(&added, &u).is_some());
        assert!(plan.relevant_substitution(&removed, &u).is_none());
        assert!(plan.relevant_substitution(&other, &u).is_none());
    }

    #[test]
    fn test_relevant_plans_keep_library_order() {
        let u = SyntacticUnifier::new();
        let p1 = Plan::on(
            Trigger::BeliefBaseAddition(turn(Term::var("X"))),
            [Goal::add_belief(Term::atom("a"))],
        );
        let p2 = Plan::on(Trigger::BeliefBaseAddition(Term::atom("other")), []);
        let p3 = Plan::on(
            Trigger::BeliefBaseAddition(turn(Term::atom("me"))),
            [Goal::add_belief(Term::atom("b"))],
        );
        let library = PlanLibrary::of([p1.clone(), p2, p3.clone()]);

        let event = Event::external(Trigger::BeliefBaseAddition(turn(Term::atom("me"))));
        let relevant = library.relevant_to(&event, &u);
        assert_eq!(relevant.plans(), &[p1, p3]);
    }

    #[test]
    fn test_guard_filters_applicability() {
        let plan = greet_plan();
        let event = Event::external(Trigger::BeliefBaseAddition(turn(Term::atom("me"))));

        assert!(!plan.is_applicable(&event, &BeliefBase::empty()));

        let beliefs =
            BeliefBase::of([Belief::new(Term::structure("other", [Term::atom("ponger")]))]);
        assert!(plan.is_applicable(&event, &beliefs));
    }

    #[test]
    fn test_instantiate_rewrites_body() {
        let beliefs =
            BeliefBase::of([Belief::new(Term::structure("other", [Term::atom("ponger")]))]);
        let event = Event::external(Trigger::BeliefBaseAddition(turn(Term::atom("me"))));
        let instance = greet_plan().instantiate(&event, &beliefs).unwrap();
        assert_eq!(
            instance.body(),
            &[Goal::act("send", [Term::atom("ponger"), Term::atom("tell"), turn(Term::atom("me"))])]
        );
        assert_eq!(instance.trigger(), event.trigger());
    }

    #[test]
    fn test_plan_identity() {
        assert_eq!(greet_plan().id(), greet_plan().id());
        let other = Plan::on(Trigger::BeliefBaseAddition(turn(Term::atom("me"))), []);
        assert_ne!(greet_plan().id(), other.id());
        assert!(greet_plan().id().to_string().starts_with("plan:"));
    }

    #[test]
    fn test_library_ignores_identical_plans() {
        let library = PlanLibrary::of([greet_plan(), greet_plan()]);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_display() {
        let plan = Plan::on(
            Trigger::BeliefBaseAddition(turn(Term::atom("me"))),
            [Goal::add_belief(Term::structure("other", [Term::atom("ponger")]))],
        );
        assert_eq!(plan.to_string(), "+turn(me) : true <- +other(ponger)");
    }
}
