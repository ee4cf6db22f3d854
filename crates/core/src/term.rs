//! Logic terms and substitutions.
//!
//! Terms are immutable first-order values: atoms, integers, strings,
//! variables and compound structures. A [`Substitution`] maps variables to
//! terms and is produced by a successful unification.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Atom(String),
    Int(i64),
    Str(String),
    Var(Var),
    Struct { functor: String, args: Vec<Term> },
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Term::Str(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Var::new(name))
    }

    /// Compound term. A structure with no arguments collapses to an atom.
    pub fn structure(functor: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        let functor = functor.into();
        let args: Vec<Term> = args.into_iter().collect();
        if args.is_empty() {
            Term::Atom(functor)
        } else {
            Term::Struct { functor, args }
        }
    }

    /// Functor name for atoms and structures.
    pub fn functor(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name),
            Term::Struct { functor, .. } => Some(functor),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Term::Struct { args, .. } => args.len(),
            _ => 0,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Struct { args, .. } => args,
            _ => &[],
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Struct { args, .. } => args.iter().all(Term::is_ground),
            _ => true,
        }
    }

    /// Same functor and arity, regardless of arguments.
    pub fn same_signature(&self, other: &Term) -> bool {
        self.functor().is_some()
            && self.functor() == other.functor()
            && self.arity() == other.arity()
    }

    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<Var>) {
        match self {
            Term::Var(v) => {
                vars.insert(v.clone());
            }
            Term::Struct { args, .. } => args.iter().for_each(|a| a.collect_variables(vars)),
            _ => {}
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => f.write_str(name),
            Term::Int(value) => write!(f, "{}", value),
            Term::Str(value) => write!(f, "{:?}", value),
            Term::Var(v) => write!(f, "{}", v),
            Term::Struct { functor, args } => {
                write!(f, "{}(", functor)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Variable bindings. Ordered so that iteration and equality are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    bindings: BTreeMap<Var, Term>,
}

impl Substitution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(bindings: impl IntoIterator<Item = (Var, Term)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn bind(&mut self, var: Var, term: Term) {
        self.bindings.insert(var, term);
    }

    pub fn with(mut self, var: Var, term: Term) -> Self {
        self.bind(var, term);
        self
    }

    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// Follows variable bindings at the top of `term` only.
    pub fn walk(&self, term: &Term) -> Term {
        let mut current = term;
        let mut seen = BTreeSet::new();
        while let Term::Var(v) = current {
            if !seen.insert(v) {
                break;
            }
            match self.bindings.get(v) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    /// Rewrites every bound variable in `term`, following chains of bindings.
    pub fn apply(&self, term: &Term) -> Term {
        self.apply_guarded(term, &mut Vec::new())
    }

    // `active` holds the variables currently being expanded so that a cyclic
    // binding (only possible without the occurs check) terminates.
    fn apply_guarded<'a>(&'a self, term: &Term, active: &mut Vec<&'a Var>) -> Term {
        match term {
            Term::Var(v) => match self.bindings.get_key_value(v) {
                Some((key, bound)) if !active.contains(&key) => {
                    active.push(key);
                    let resolved = self.apply_guarded(bound, active);
                    active.pop();
                    resolved
                }
                _ => term.clone(),
            },
            Term::Struct { functor, args } => Term::Struct {
                functor: functor.clone(),
                args: args.iter().map(|a| self.apply_guarded(a, active)).collect(),
            },
            _ => term.clone(),
        }
    }

    /// Sequential composition: applying the result equals applying `self`
    /// and then `other`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut bindings: BTreeMap<Var, Term> = self
            .bindings
            .iter()
            .map(|(v, t)| (v.clone(), other.apply(t)))
            .collect();
        for (v, t) in &other.bindings {
            bindings.entry(v.clone()).or_insert_with(|| t.clone());
        }
        Substitution { bindings }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (v, t)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", v, t)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(who: Term) -> Term {
        Term::structure("turn", [who])
    }

    #[test]
    fn test_structure_without_args_is_atom() {
        assert_eq!(Term::structure("ping", []), Term::atom("ping"));
    }

    #[test]
    fn test_display_prolog_style() {
        let t = Term::structure("msg", [Term::atom("me"), Term::int(3), Term::var("X")]);
        assert_eq!(t.to_string(), "msg(me, 3, X)");
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn test_ground_and_variables() {
        assert!(turn(Term::atom("me")).is_ground());
        let open = turn(Term::var("Who"));
        assert!(!open.is_ground());
        assert_eq!(open.variables().into_iter().collect::<Vec<_>>(), vec![Var::new("Who")]);
    }

    #[test]
    fn test_signature() {
        assert!(turn(Term::atom("me")).same_signature(&turn(Term::atom("you"))));
        assert!(!turn(Term::atom("me")).same_signature(&Term::atom("turn")));
        assert!(!Term::int(1).same_signature(&Term::int(1)));
    }

    #[test]
    fn test_apply_follows_chains() {
        let s = Substitution::empty()
            .with(Var::new("X"), Term::var("Y"))
            .with(Var::new("Y"), Term::atom("me"));
        assert_eq!(s.apply(&turn(Term::var("X"))), turn(Term::atom("me")));
        assert_eq!(s.walk(&Term::var("X")), Term::atom("me"));
    }

    #[test]
    fn test_apply_terminates_on_cycle() {
        let s = Substitution::empty().with(Var::new("X"), turn(Term::var("X")));
        assert_eq!(s.apply(&Term::var("X")), turn(Term::var("X")));
    }

    #[test]
    fn test_compose_is_sequential_application() {
        let first = Substitution::empty().with(Var::new("X"), turn(Term::var("Y")));
        let second = Substitution::empty().with(Var::new("Y"), Term::atom("me"));
        let composed = first.compose(&second);
        let t = Term::structure("p", [Term::var("X"), Term::var("Y")]);
        assert_eq!(composed.apply(&t), second.apply(&first.apply(&t)));
    }
}
