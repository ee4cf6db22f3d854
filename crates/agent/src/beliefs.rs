//! The belief base: an agent-local multiset of belief terms.
//!
//! Insertion is deduplicated modulo unification (a belief is not added when
//! any member already unifies with it), removal is exact. Every operation
//! returns a new [`BeliefBase`]; the owning agent keeps the current value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use bdi_core::{unify, Substitution, SyntacticUnifier, Term, Unifier};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Belief(Term);

impl Belief {
    pub fn new(term: Term) -> Self {
        Self(term)
    }

    pub fn term(&self) -> &Term {
        &self.0
    }

    pub fn into_term(self) -> Term {
        self.0
    }
}

impl From<Term> for Belief {
    fn from(term: Term) -> Self {
        Self(term)
    }
}

impl fmt::Display for Belief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct BeliefBase {
    beliefs: Vec<Belief>,
    unifier: Arc<dyn Unifier>,
}

impl BeliefBase {
    pub fn empty() -> Self {
        Self::with_unifier(Arc::new(SyntacticUnifier::default()))
    }

    pub fn with_unifier(unifier: Arc<dyn Unifier>) -> Self {
        Self {
            beliefs: Vec::new(),
            unifier,
        }
    }

    /// Builds a base from `beliefs`, dropping duplicates.
    pub fn of(beliefs: impl IntoIterator<Item = Belief>) -> Self {
        Self::empty().add_all(beliefs, |_| {})
    }

    /// Empty base sharing this base's unifier.
    pub fn cleared(&self) -> Self {
        Self::with_unifier(Arc::clone(&self.unifier))
    }

    pub fn unifier(&self) -> &Arc<dyn Unifier> {
        &self.unifier
    }

    /// Inserts `belief` unless a member already unifies with it.
    /// `on_added` runs once per actual insertion.
    pub fn add(&self, belief: Belief, mut on_added: impl FnMut(&Belief)) -> Self {
        if self.count(belief.term()) > 0 {
            return self.clone();
        }
        on_added(&belief);
        let mut beliefs = self.beliefs.clone();
        beliefs.push(belief);
        Self {
            beliefs,
            unifier: Arc::clone(&self.unifier),
        }
    }

    pub fn add_all(
        &self,
        beliefs: impl IntoIterator<Item = Belief>,
        mut on_added: impl FnMut(&Belief),
    ) -> Self {
        beliefs
            .into_iter()
            .fold(self.clone(), |base, belief| base.add(belief, &mut on_added))
    }

    /// Deletes every member structurally equal to `belief`.
    pub fn remove(&self, belief: &Belief, mut on_removed: impl FnMut(&Belief)) -> Self {
        let (removed, kept): (Vec<Belief>, Vec<Belief>) =
            self.beliefs.iter().cloned().partition(|b| b == belief);
        removed.iter().for_each(|b| on_removed(b));
        Self {
            beliefs: kept,
            unifier: Arc::clone(&self.unifier),
        }
    }

    /// Replaces every member with the same functor and arity as `belief`,
    /// then adds `belief`.
    pub fn update(
        &self,
        belief: Belief,
        mut on_removed: impl FnMut(&Belief),
        on_added: impl FnMut(&Belief),
    ) -> Self {
        let (removed, kept): (Vec<Belief>, Vec<Belief>) = self
            .beliefs
            .iter()
            .cloned()
            .partition(|b| b.term().same_signature(belief.term()) || b == &belief);
        removed.iter().for_each(|b| on_removed(b));
        Self {
            beliefs: kept,
            unifier: Arc::clone(&self.unifier),
        }
        .add(belief, on_added)
    }

    /// First member unifying with `query`.
    pub fn retrieve(&self, query: &Term) -> Option<(Belief, Substitution)> {
        unify::retrieve(self.unifier.as_ref(), self.terms(), query)
            .map(|(term, subst)| (Belief::new(term.clone()), subst))
    }

    /// All members unifying with `query`, in insertion order.
    pub fn retrieve_all(&self, query: &Term) -> Vec<(Belief, Substitution)> {
        unify::retrieve_all(self.unifier.as_ref(), self.terms(), query)
            .into_iter()
            .map(|(term, subst)| (Belief::new(term.clone()), subst))
            .collect()
    }

    /// Number of members unifying with `term`.
    pub fn count(&self, term: &Term) -> usize {
        unify::count(self.unifier.as_ref(), self.terms(), term)
    }

    /// Exact membership.
    pub fn contains(&self, belief: &Belief) -> bool {
        self.beliefs.contains(belief)
    }

    pub fn len(&self) -> usize {
        self.beliefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Belief> {
        self.beliefs.iter()
    }

    fn terms(&self) -> impl Iterator<Item = &Term> {
        self.beliefs.iter().map(Belief::term)
    }
}

impl Default for BeliefBase {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for BeliefBase {
    fn eq(&self, other: &Self) -> bool {
        self.beliefs == other.beliefs
    }
}

impl fmt::Display for BeliefBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, belief) in self.beliefs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", belief)?;
        }
        f.write_str("}")
    }
}

/// Result of merging perceptions into a belief base.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefUpdate {
    pub beliefs: BeliefBase,
    pub added: Vec<Belief>,
    pub removed: Vec<Belief>,
}

impl BeliefUpdate {
    pub fn unchanged(beliefs: BeliefBase) -> Self {
        Self {
            beliefs,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdi_core::Var;

    fn belief(functor: &str, arg: &str) -> Belief {
        Belief::new(Term::structure(functor, [Term::atom(arg)]))
    }

    #[test]
    fn test_duplicate_insertion_is_suppressed() {
        let b = belief("turn", "me");
        let once = BeliefBase::empty().add(b.clone(), |_| {});
        let twice = once.add(b.clone(), |_| {});
        assert_eq!(once.count(b.term()), 1);
        assert_eq!(twice.count(b.term()), once.count(b.term()));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_observer_fires_once_per_insertion() {
        let mut calls = Vec::new();
        let base = BeliefBase::empty()
            .add(belief("turn", "me"), |b| calls.push(b.clone()))
            .add(belief("turn", "me"), |b| calls.push(b.clone()));
        // `turn(X)` unifies with `turn(me)`, so it counts as a duplicate too
        let base = base.add(
            Belief::new(Term::structure("turn", [Term::var("X")])),
            |b| calls.push(b.clone()),
        );
        assert_eq!(calls, vec![belief("turn", "me")]);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_add_is_pure() {
        let empty = BeliefBase::empty();
        let one = empty.add(belief("turn", "me"), |_| {});
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_add_all_preserves_order() {
        let base = BeliefBase::of([
            belief("turn", "me"),
            belief("other", "ponger"),
            belief("turn", "me"),
        ]);
        let members: Vec<_> = base.iter().cloned().collect();
        assert_eq!(members, vec![belief("turn", "me"), belief("other", "ponger")]);
    }

    #[test]
    fn test_remove_is_exact() {
        let base = BeliefBase::of([belief("turn", "me"), belief("other", "ponger")]);
        let mut removed = Vec::new();

        let pattern = Belief::new(Term::structure("turn", [Term::var("X")]));
        let same = base.remove(&pattern, |b| removed.push(b.clone()));
        assert_eq!(same.len(), 2);
        assert!(removed.is_empty());

        let smaller = base.remove(&belief("turn", "me"), |b| removed.push(b.clone()));
        assert_eq!(removed, vec![belief("turn", "me")]);
        assert!(!smaller.contains(&belief("turn", "me")));
        assert!(smaller.contains(&belief("other", "ponger")));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_update_replaces_same_signature() {
        let counter = |n| Belief::new(Term::structure("counter", [Term::int(n)]));
        let base = BeliefBase::of([counter(1), belief("turn", "me")]);
        let mut removed = Vec::new();
        let mut added = Vec::new();
        let updated = base.update(
            counter(2),
            |b| removed.push(b.clone()),
            |b| added.push(b.clone()),
        );
        assert_eq!(removed, vec![counter(1)]);
        assert_eq!(added, vec![counter(2)]);
        assert!(updated.contains(&counter(2)));
        assert!(updated.contains(&belief("turn", "me")));
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn test_retrieve() {
        let base = BeliefBase::of([belief("turn", "me"), belief("turn", "you")]);
        let query = Term::structure("turn", [Term::var("W")]);

        let (first, s) = base.retrieve(&query).unwrap();
        assert_eq!(first, belief("turn", "me"));
        assert_eq!(s.get(&Var::new("W")), Some(&Term::atom("me")));

        let all = base.retrieve_all(&query);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].0, belief("turn", "you"));

        assert!(base.retrieve(&Term::atom("nothing")).is_none());
    }

    #[test]
    fn test_display() {
        let base = BeliefBase::of([belief("turn", "me"), belief("other", "ponger")]);
        assert_eq!(base.to_string(), "{turn(me), other(ponger)}");
    }
}
