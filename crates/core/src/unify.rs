//! Contract of the unification service and a default syntactic implementation.
//!
//! The runtime never inspects term structure for matching on its own; it goes
//! through a [`Unifier`]. The free functions in this module (`matches`,
//! `count`, `retrieve`, ...) are the operations the runtime consumes, and all
//! of them treat a service error as "no match".

use tracing::warn;

use crate::error::Result;
use crate::term::{Substitution, Term};

pub trait Unifier: Send + Sync + std::fmt::Debug {
    /// Most general unifier of `left` and `right`, `None` if they do not unify.
    fn unify(&self, left: &Term, right: &Term) -> Result<Option<Substitution>>;

    /// Unifies under an existing substitution and returns the extended one.
    fn unify_under(
        &self,
        left: &Term,
        right: &Term,
        context: &Substitution,
    ) -> Result<Option<Substitution>> {
        let left = context.apply(left);
        let right = context.apply(right);
        Ok(self.unify(&left, &right)?.map(|mgu| context.compose(&mgu)))
    }
}

/// Plain first-order syntactic unification.
#[derive(Debug, Clone, Copy)]
pub struct SyntacticUnifier {
    pub occurs_check: bool,
}

impl SyntacticUnifier {
    pub fn new() -> Self {
        Self { occurs_check: true }
    }

    pub fn without_occurs_check() -> Self {
        Self {
            occurs_check: false,
        }
    }

    fn solve(&self, left: &Term, right: &Term) -> Option<Substitution> {
        let mut subst = Substitution::empty();
        let mut pending = vec![(left.clone(), right.clone())];

        while let Some((a, b)) = pending.pop() {
            let a = subst.walk(&a);
            let b = subst.walk(&b);
            match (a, b) {
                (Term::Var(x), Term::Var(y)) if x == y => {}
                (Term::Var(x), t) | (t, Term::Var(x)) => {
                    if self.occurs_check && subst.apply(&t).variables().contains(&x) {
                        return None;
                    }
                    subst.bind(x, t);
                }
                (
                    Term::Struct {
                        functor: f1,
                        args: a1,
                    },
                    Term::Struct {
                        functor: f2,
                        args: a2,
                    },
                ) => {
                    if f1 != f2 || a1.len() != a2.len() {
                        return None;
                    }
                    pending.extend(a1.into_iter().zip(a2));
                }
                (a, b) => {
                    if a != b {
                        return None;
                    }
                }
            }
        }

        // Resolve chains so every binding is expressed in terms of free variables.
        let resolved = Substitution::of(subst.iter().map(|(v, t)| (v.clone(), subst.apply(t))));
        Some(resolved)
    }
}

impl Default for SyntacticUnifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Unifier for SyntacticUnifier {
    fn unify(&self, left: &Term, right: &Term) -> Result<Option<Substitution>> {
        Ok(self.solve(left, right))
    }
}

/// Unifies `pattern` with `term`; service errors count as no match.
pub fn matches(unifier: &dyn Unifier, pattern: &Term, term: &Term) -> Option<Substitution> {
    match unifier.unify(pattern, term) {
        Ok(result) => result,
        Err(e) => {
            warn!(
                pattern = %pattern,
                term = %term,
                error = %e,
                "Unification failed, treating as no match"
            );
            None
        }
    }
}

/// Like [`matches`], extending an existing substitution.
pub fn matches_under(
    unifier: &dyn Unifier,
    pattern: &Term,
    term: &Term,
    context: &Substitution,
) -> Option<Substitution> {
    match unifier.unify_under(pattern, term, context) {
        Ok(result) => result,
        Err(e) => {
            warn!(
                pattern = %pattern,
                term = %term,
                error = %e,
                "Unification failed, treating as no match"
            );
            None
        }
    }
}

/// Number of members of `items` that unify with `term`.
pub fn count<'a, I>(unifier: &dyn Unifier, items: I, term: &Term) -> usize
where
    I: IntoIterator<Item = &'a Term>,
{
    items
        .into_iter()
        .filter(|item| matches(unifier, term, item).is_some())
        .count()
}

/// First member unifying with `query`, with its substitution.
pub fn retrieve<'a, I>(
    unifier: &dyn Unifier,
    items: I,
    query: &Term,
) -> Option<(&'a Term, Substitution)>
where
    I: IntoIterator<Item = &'a Term>,
{
    items
        .into_iter()
        .find_map(|item| matches(unifier, query, item).map(|s| (item, s)))
}

/// Every member unifying with `query`, in iteration order.
pub fn retrieve_all<'a, I>(
    unifier: &dyn Unifier,
    items: I,
    query: &Term,
) -> Vec<(&'a Term, Substitution)>
where
    I: IntoIterator<Item = &'a Term>,
{
    items
        .into_iter()
        .filter_map(|item| matches(unifier, query, item).map(|s| (item, s)))
        .collect()
}

/// Members that unify with `query`.
pub fn filter<'a, I>(unifier: &dyn Unifier, items: I, query: &Term) -> Vec<&'a Term>
where
    I: IntoIterator<Item = &'a Term>,
{
    items
        .into_iter()
        .filter(|item| matches(unifier, query, item).is_some())
        .collect()
}
