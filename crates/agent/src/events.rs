//! Triggers, events and the event queue.
//!
//! An [`Event`] pairs a [`Trigger`] with the intention that raised it.
//! External events (perceptions, messages) carry no intention; internal
//! events (sub-goals and their failures) name the intention they belong to.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use bdi_core::{Substitution, Term};

use crate::beliefs::Belief;
use crate::types::IntentionId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    BeliefBaseAddition(Term),
    BeliefBaseRemoval(Term),
    BeliefBaseUpdate(Term),
    TestGoalInvocation(Term),
    TestGoalFailure(Term),
    AchievementGoalInvocation(Term),
    AchievementGoalFailure(Term),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    BeliefBaseAddition,
    BeliefBaseRemoval,
    BeliefBaseUpdate,
    TestGoalInvocation,
    TestGoalFailure,
    AchievementGoalInvocation,
    AchievementGoalFailure,
}

impl Trigger {
    pub fn new(kind: TriggerKind, value: Term) -> Self {
        match kind {
            TriggerKind::BeliefBaseAddition => Trigger::BeliefBaseAddition(value),
            TriggerKind::BeliefBaseRemoval => Trigger::BeliefBaseRemoval(value),
            TriggerKind::BeliefBaseUpdate => Trigger::BeliefBaseUpdate(value),
            TriggerKind::TestGoalInvocation => Trigger::TestGoalInvocation(value),
            TriggerKind::TestGoalFailure => Trigger::TestGoalFailure(value),
            TriggerKind::AchievementGoalInvocation => Trigger::AchievementGoalInvocation(value),
            TriggerKind::AchievementGoalFailure => Trigger::AchievementGoalFailure(value),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::BeliefBaseAddition(_) => TriggerKind::BeliefBaseAddition,
            Trigger::BeliefBaseRemoval(_) => TriggerKind::BeliefBaseRemoval,
            Trigger::BeliefBaseUpdate(_) => TriggerKind::BeliefBaseUpdate,
            Trigger::TestGoalInvocation(_) => TriggerKind::TestGoalInvocation,
            Trigger::TestGoalFailure(_) => TriggerKind::TestGoalFailure,
            Trigger::AchievementGoalInvocation(_) => TriggerKind::AchievementGoalInvocation,
            Trigger::AchievementGoalFailure(_) => TriggerKind::AchievementGoalFailure,
        }
    }

    /// The term that caused this trigger.
    pub fn value(&self) -> &Term {
        match self {
            Trigger::BeliefBaseAddition(t)
            | Trigger::BeliefBaseRemoval(t)
            | Trigger::BeliefBaseUpdate(t)
            | Trigger::TestGoalInvocation(t)
            | Trigger::TestGoalFailure(t)
            | Trigger::AchievementGoalInvocation(t)
            | Trigger::AchievementGoalFailure(t) => t,
        }
    }

    pub fn is_goal_invocation(&self) -> bool {
        matches!(
            self,
            Trigger::TestGoalInvocation(_) | Trigger::AchievementGoalInvocation(_)
        )
    }

    pub fn is_goal_failure(&self) -> bool {
        matches!(
            self,
            Trigger::TestGoalFailure(_) | Trigger::AchievementGoalFailure(_)
        )
    }

    /// Failure trigger matching a goal invocation.
    pub fn failure(&self) -> Option<Trigger> {
        match self {
            Trigger::TestGoalInvocation(t) => Some(Trigger::TestGoalFailure(t.clone())),
            Trigger::AchievementGoalInvocation(t) => {
                Some(Trigger::AchievementGoalFailure(t.clone()))
            }
            _ => None,
        }
    }

    pub fn apply(&self, substitution: &Substitution) -> Trigger {
        Trigger::new(self.kind(), substitution.apply(self.value()))
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            TriggerKind::BeliefBaseAddition => "+",
            TriggerKind::BeliefBaseRemoval => "-",
            TriggerKind::BeliefBaseUpdate => "-+",
            TriggerKind::TestGoalInvocation => "+?",
            TriggerKind::TestGoalFailure => "-?",
            TriggerKind::AchievementGoalInvocation => "+!",
            TriggerKind::AchievementGoalFailure => "-!",
        };
        write!(f, "{}{}", prefix, self.value())
    }
}

/// Immutable once created; consumed when dequeued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    trigger: Trigger,
    intention: Option<IntentionId>,
}

impl Event {
    pub fn new(trigger: Trigger, intention: Option<IntentionId>) -> Self {
        Self { trigger, intention }
    }

    pub fn external(trigger: Trigger) -> Self {
        Self::new(trigger, None)
    }

    pub fn internal(trigger: Trigger, intention: IntentionId) -> Self {
        Self::new(trigger, Some(intention))
    }

    pub fn belief_base_addition(belief: &Belief) -> Self {
        Self::external(Trigger::BeliefBaseAddition(belief.term().clone()))
    }

    pub fn belief_base_removal(belief: &Belief) -> Self {
        Self::external(Trigger::BeliefBaseRemoval(belief.term().clone()))
    }

    pub fn belief_base_update(belief: &Belief) -> Self {
        Self::external(Trigger::BeliefBaseUpdate(belief.term().clone()))
    }

    pub fn achievement_goal(goal: Term, intention: Option<IntentionId>) -> Self {
        Self::new(Trigger::AchievementGoalInvocation(goal), intention)
    }

    pub fn test_goal(goal: Term, intention: Option<IntentionId>) -> Self {
        Self::new(Trigger::TestGoalInvocation(goal), intention)
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn intention(&self) -> Option<IntentionId> {
        self.intention
    }

    pub fn is_internal(&self) -> bool {
        self.intention.is_some()
    }

    pub fn is_external(&self) -> bool {
        self.intention.is_none()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.intention {
            Some(id) => write!(f, "{} [{}]", self.trigger, id),
            None => write!(f, "{}", self.trigger),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn enqueue_all(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    /// Removes and returns the event at `index`, as chosen by a selection policy.
    pub fn dequeue_selected(&mut self, index: usize) -> Option<Event> {
        self.events.remove(index)
    }

    /// Discards every internal event owned by `intention`.
    pub fn discard_for(&mut self, intention: IntentionId) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.intention() != Some(intention));
        before - self.events.len()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventQueue {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(name: &str) -> Term {
        Term::atom(name)
    }

    #[test]
    fn test_external_and_internal() {
        let ext = Event::achievement_goal(goal("start"), None);
        let int = Event::achievement_goal(goal("step"), Some(IntentionId(3)));
        assert!(ext.is_external() && !ext.is_internal());
        assert!(int.is_internal() && !int.is_external());
        assert_eq!(int.intention(), Some(IntentionId(3)));
    }

    #[test]
    fn test_trigger_failure_mapping() {
        let achieve = Trigger::AchievementGoalInvocation(goal("g"));
        let test = Trigger::TestGoalInvocation(goal("g"));
        assert_eq!(achieve.failure(), Some(Trigger::AchievementGoalFailure(goal("g"))));
        assert_eq!(test.failure(), Some(Trigger::TestGoalFailure(goal("g"))));
        assert_eq!(Trigger::BeliefBaseAddition(goal("g")).failure(), None);
        assert!(achieve.is_goal_invocation());
        assert!(achieve.failure().map(|f| f.is_goal_failure()).unwrap_or(false));
    }

    #[test]
    fn test_trigger_kind_roundtrip() {
        let t = Trigger::BeliefBaseRemoval(goal("x"));
        assert_eq!(Trigger::new(t.kind(), t.value().clone()), t);
    }

    #[test]
    fn test_trigger_display() {
        let turn = Term::structure("turn", [Term::atom("me")]);
        assert_eq!(Trigger::BeliefBaseAddition(turn.clone()).to_string(), "+turn(me)");
        assert_eq!(Trigger::AchievementGoalFailure(turn).to_string(), "-!turn(me)");
    }

    #[test]
    fn test_default_order_is_fifo() {
        let e1 = Event::achievement_goal(goal("e1"), None);
        let e2 = Event::achievement_goal(goal("e2"), None);
        let e3 = Event::achievement_goal(goal("e3"), None);

        let mut queue = EventQueue::new();
        queue.enqueue(e1.clone());
        queue.enqueue(e2.clone());
        queue.enqueue(e3.clone());

        assert_eq!(queue.dequeue_selected(0), Some(e1));
        assert_eq!(queue.dequeue_selected(0), Some(e2));
        assert_eq!(queue.dequeue_selected(0), Some(e3));
        assert_eq!(queue.dequeue_selected(0), None);
    }

    #[test]
    fn test_discard_for_intention() {
        let mut queue: EventQueue = [
            Event::achievement_goal(goal("a"), Some(IntentionId(1))),
            Event::achievement_goal(goal("b"), None),
            Event::test_goal(goal("c"), Some(IntentionId(1))),
        ]
        .into_iter()
        .collect();
        assert_eq!(queue.discard_for(IntentionId(1)), 2);
        assert_eq!(queue.len(), 1);
        assert!(queue.get(0).map(Event::is_external).unwrap_or(false));
    }
}
