use serde::{Deserialize, Serialize};
use std::fmt;

use bdi_core::{Substitution, Term};

use crate::beliefs::BeliefBase;

/// One step of a plan body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    /// `!g`: post an achievement sub-goal and wait for it
    Achieve(Term),
    /// `?g`: query the belief base, falling back to a test-goal event
    Test(Term),
    /// `+b`
    AddBelief(Term),
    /// `-b`
    RemoveBelief(Term),
    /// `-+b`
    UpdateBelief(Term),
    /// Call to a registered action
    Act { name: String, args: Vec<Term> },
}

impl Goal {
    pub fn achieve(term: Term) -> Self {
        Goal::Achieve(term)
    }

    pub fn test(term: Term) -> Self {
        Goal::Test(term)
    }

    pub fn add_belief(term: Term) -> Self {
        Goal::AddBelief(term)
    }

    pub fn remove_belief(term: Term) -> Self {
        Goal::RemoveBelief(term)
    }

    pub fn update_belief(term: Term) -> Self {
        Goal::UpdateBelief(term)
    }

    pub fn act(name: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Goal::Act {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn apply(&self, substitution: &Substitution) -> Goal {
        match self {
            Goal::Achieve(t) => Goal::Achieve(substitution.apply(t)),
            Goal::Test(t) => Goal::Test(substitution.apply(t)),
            Goal::AddBelief(t) => Goal::AddBelief(substitution.apply(t)),
            Goal::RemoveBelief(t) => Goal::RemoveBelief(substitution.apply(t)),
            Goal::UpdateBelief(t) => Goal::UpdateBelief(substitution.apply(t)),
            Goal::Act { name, args } => Goal::Act {
                name: name.clone(),
                args: args.iter().map(|a| substitution.apply(a)).collect(),
            },
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Achieve(t) => write!(f, "!{}", t),
            Goal::Test(t) => write!(f, "?{}", t),
            Goal::AddBelief(t) => write!(f, "+{}", t),
            Goal::RemoveBelief(t) => write!(f, "-{}", t),
            Goal::UpdateBelief(t) => write!(f, "-+{}", t),
            Goal::Act { name, args } => {
                write!(f, "{}", Term::structure(name.as_str(), args.iter().cloned()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Some belief unifies with the term
    Holds(Term),
    /// No belief unifies with the term (negation as failure)
    Not(Term),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Holds(t) => write!(f, "{}", t),
            Condition::Not(t) => write!(f, "not {}", t),
        }
    }
}

/// Context condition of a plan: a conjunction evaluated against the belief base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guard {
    conditions: Vec<Condition>,
}

impl Guard {
    /// The trivially true guard.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn holds(term: Term) -> Self {
        Self::always().and(term)
    }

    pub fn and(mut self, term: Term) -> Self {
        self.conditions.push(Condition::Holds(term));
        self
    }

    pub fn and_not(mut self, term: Term) -> Self {
        self.conditions.push(Condition::Not(term));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_trivial(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn apply(&self, substitution: &Substitution) -> Guard {
        Guard {
            conditions: self
                .conditions
                .iter()
                .map(|c| match c {
                    Condition::Holds(t) => Condition::Holds(substitution.apply(t)),
                    Condition::Not(t) => Condition::Not(substitution.apply(t)),
                })
                .collect(),
        }
    }

    /// First solution of the guard that extends `context`, trying belief
    /// alternatives depth-first in belief base order.
    pub fn solve(&self, beliefs: &BeliefBase, context: &Substitution) -> Option<Substitution> {
        self.solve_from(0, beliefs, context)
    }

    fn solve_from(
        &self,
        index: usize,
        beliefs: &BeliefBase,
        context: &Substitution,
    ) -> Option<Substitution> {
        match self.conditions.get(index) {
            None => Some(context.clone()),
            Some(Condition::Holds(term)) => beliefs
                .retrieve_all(&context.apply(term))
                .into_iter()
                .find_map(|(_, found)| {
                    self.solve_from(index + 1, beliefs, &context.compose(&found))
                }),
            Some(Condition::Not(term)) => {
                if beliefs.retrieve(&context.apply(term)).is_some() {
                    None
                } else {
                    self.solve_from(index + 1, beliefs, context)
                }
            }
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("true");
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" & ")?;
            }
            write!(f, "{}", condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beliefs::Belief;
    use bdi_core::Var;

    fn fact(functor: &str, args: &[&str]) -> Belief {
        Belief::new(Term::structure(functor, args.iter().map(|a| Term::atom(*a))))
    }

    #[test]
    fn test_trivial_guard_holds() {
        let s = Guard::always().solve(&BeliefBase::empty(), &Substitution::empty());
        assert_eq!(s, Some(Substitution::empty()));
    }

    #[test]
    fn test_guard_binds_variables() {
        let beliefs = BeliefBase::of([fact("other", &["ponger"])]);
        let guard = Guard::holds(Term::structure("other", [Term::var("Peer")]));
        let s = guard.solve(&beliefs, &Substitution::empty()).unwrap();
        assert_eq!(s.get(&Var::new("Peer")), Some(&Term::atom("ponger")));
    }

    #[test]
    fn test_guard_backtracks_over_alternatives() {
        let beliefs = BeliefBase::of([
            fact("peer", &["alice"]),
            fact("peer", &["bob"]),
            fact("online", &["bob"]),
        ]);
        let guard = Guard::holds(Term::structure("peer", [Term::var("P")]))
            .and(Term::structure("online", [Term::var("P")]));
        let s = guard.solve(&beliefs, &Substitution::empty()).unwrap();
        assert_eq!(s.apply(&Term::var("P")), Term::atom("bob"));
    }

    #[test]
    fn test_negation_as_failure() {
        let beliefs = BeliefBase::of([fact("busy", &["me"])]);
        let guard = Guard::always().and_not(Term::structure("busy", [Term::atom("me")]));
        assert!(guard.solve(&beliefs, &Substitution::empty()).is_none());
        assert!(guard.solve(&BeliefBase::empty(), &Substitution::empty()).is_some());
    }

    #[test]
    fn test_guard_respects_context() {
        let beliefs = BeliefBase::of([fact("turn", &["me"])]);
        let guard = Guard::holds(Term::structure("turn", [Term::var("W")]));
        let ctx = Substitution::empty().with(Var::new("W"), Term::atom("you"));
        assert!(guard.solve(&beliefs, &ctx).is_none());
    }

    #[test]
    fn test_goal_apply_and_display() {
        let s = Substitution::empty().with(Var::new("X"), Term::atom("ponger"));
        let g = Goal::act("send", [Term::var("X"), Term::atom("tell"), Term::atom("hi")]);
        assert_eq!(g.apply(&s).to_string(), "send(ponger, tell, hi)");
        assert_eq!(Goal::achieve(Term::atom("start")).to_string(), "!start");
        assert_eq!(Guard::holds(Term::atom("a")).and_not(Term::atom("b")).to_string(), "a & not b");
    }
}
