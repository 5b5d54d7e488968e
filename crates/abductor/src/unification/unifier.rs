//! Term substitutions recorded as equality assumptions

use crate::kb::PredicateId;
use crate::logic::{Literal, Term};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt;

/// A set of equality assumptions `x = y` together with the map `x -> y`
/// they induce.
///
/// `add(x, y)` keeps `y` and replaces `x`. The first binding of `x` wins;
/// later pairs for the same `x` are still recorded as assumptions but do
/// not change the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unifier {
    substitutions: IndexSet<(Term, Term)>,
    mapping: HashMap<Term, Term>,
}

impl Unifier {
    /// Create a new empty unifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a unifier from pairs, in order
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a Term, &'a Term)>) -> Self {
        let mut uni = Unifier::new();
        for (x, y) in pairs {
            uni.add(x, y);
        }
        uni
    }

    /// Assume `x = y`. A no-op when the terms are identical.
    pub fn add(&mut self, x: &Term, y: &Term) {
        if x == y {
            return;
        }
        self.substitutions.insert((x.clone(), y.clone()));
        self.mapping.entry(x.clone()).or_insert_with(|| y.clone());
    }

    /// Identify `x` and `y` after resolving both through the current
    /// mapping. Returns false, leaving the unifier unchanged, when they
    /// resolve to two distinct constants that `soft` does not accept.
    ///
    /// Constants are kept as the representatives, so a variable bound to
    /// one constant is never silently identified with another.
    pub fn unify_terms(&mut self, x: &Term, y: &Term, soft: impl FnOnce(&Term, &Term) -> bool) -> bool {
        let rx = self.resolve(x).clone();
        let ry = self.resolve(y).clone();
        if rx == ry {
            return true;
        }
        match (rx.is_constant(), ry.is_constant()) {
            (true, true) => {
                if !soft(&rx, &ry) {
                    return false;
                }
                self.add(&rx, &ry);
            }
            (true, false) => self.add(&ry, &rx),
            _ => self.add(&rx, &ry),
        }
        true
    }

    /// Follow the mapping from `term` to the term it finally stands for
    pub fn resolve<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        // bounded so that cyclic pairs given to `add` cannot loop
        for _ in 0..=self.mapping.len() {
            match self.mapping.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// What `x` is replaced by, if anything
    pub fn find_substitution_term(&self, x: &Term) -> Option<&Term> {
        self.mapping.get(x)
    }

    /// Apply one substitution step to a term
    pub fn apply(&self, term: &Term) -> Term {
        self.mapping.get(term).unwrap_or(term).clone()
    }

    /// Apply one substitution step to every term of `literal`
    pub fn apply_literal(&self, literal: &Literal) -> Literal {
        Literal::new(
            literal.predicate,
            literal.terms.iter().map(|t| self.apply(t)).collect(),
            literal.polarity,
        )
    }

    /// Equality assumptions in insertion order
    pub fn substitutions(&self) -> impl Iterator<Item = &(Term, Term)> {
        self.substitutions.iter()
    }

    /// Equality assumptions as `=` literals
    pub fn equality_literals(&self, equality: PredicateId) -> Vec<Literal> {
        self.substitutions
            .iter()
            .map(|(x, y)| Literal::positive(equality, vec![x.clone(), y.clone()]))
            .collect()
    }

    pub fn mapping(&self) -> &HashMap<Term, Term> {
        &self.mapping
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    pub fn clear(&mut self) {
        self.substitutions.clear();
        self.mapping.clear();
    }
}

impl fmt::Display for Unifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (x, y)) in self.substitutions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", x, y)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_terms_are_skipped() {
        let mut uni = Unifier::new();
        uni.add(&Term::variable("X"), &Term::variable("X"));
        assert!(uni.is_empty());
    }

    #[test]
    fn test_direction_keeps_second_term() {
        let x = Term::variable("X");
        let a = Term::constant("a");
        let mut uni = Unifier::new();
        uni.add(&x, &a);
        assert_eq!(uni.find_substitution_term(&x), Some(&a));
        assert_eq!(uni.find_substitution_term(&a), None);
        assert_eq!(uni.apply(&x), a);
    }

    #[test]
    fn test_first_binding_wins() {
        let x = Term::variable("X");
        let y = Term::variable("Y");
        let z = Term::variable("Z");
        let mut uni = Unifier::new();
        uni.add(&x, &y);
        uni.add(&x, &z);
        assert_eq!(uni.find_substitution_term(&x), Some(&y));
        // both assumptions are kept
        assert_eq!(uni.len(), 2);
        assert_eq!(uni.to_string(), "{X=Y, X=Z}");
    }

    #[test]
    fn test_apply_literal_and_clear() {
        let p = PredicateId(0);
        let x = Term::variable("X");
        let a = Term::constant("a");
        let mut uni = Unifier::from_pairs([(&x, &a)]);
        let lit = Literal::positive(p, vec![x.clone(), Term::variable("Y")]);
        assert_eq!(
            uni.apply_literal(&lit),
            Literal::positive(p, vec![a.clone(), Term::variable("Y")])
        );
        uni.clear();
        assert!(uni.is_empty());
        assert!(uni.mapping().is_empty());
    }

    #[test]
    fn test_unify_terms_resolves_earlier_bindings() {
        let x = Term::variable("X");
        let a = Term::constant("a");
        let b = Term::constant("b");
        let mut uni = Unifier::new();
        assert!(uni.unify_terms(&x, &a, |_, _| false));
        assert!(uni.unify_terms(&x, &a, |_, _| false));
        assert_eq!(uni.len(), 1);
        // X already stands for a, so X = b would identify a and b
        assert!(!uni.unify_terms(&x, &b, |_, _| false));
        assert_eq!(uni.len(), 1);
        assert!(uni.unify_terms(&x, &b, |_, _| true));
        assert_eq!(uni.resolve(&x), &b);
    }

    #[test]
    fn test_unify_terms_keeps_constants_as_representatives() {
        let y = Term::variable("Y");
        let z = Term::variable("Z");
        let a = Term::constant("a");
        let b = Term::constant("b");
        let mut uni = Unifier::new();
        assert!(uni.unify_terms(&a, &y, |_, _| false));
        assert_eq!(uni.find_substitution_term(&y), Some(&a));
        assert!(uni.unify_terms(&z, &y, |_, _| false));
        assert_eq!(uni.resolve(&z), &a);
        assert!(!uni.unify_terms(&b, &z, |_, _| false));
    }

    #[test]
    fn test_resolve_stops_on_cycles() {
        let x = Term::variable("X");
        let y = Term::variable("Y");
        let uni = Unifier::from_pairs([(&x, &y), (&y, &x)]);
        let r = uni.resolve(&x);
        assert!(r == &x || r == &y);
    }

    #[test]
    fn test_equality_literals() {
        let eq = PredicateId(3);
        let uni = Unifier::from_pairs([(&Term::variable("X"), &Term::variable("Y"))]);
        let lits = uni.equality_literals(eq);
        assert_eq!(lits.len(), 1);
        assert_eq!(lits[0].predicate, eq);
        assert!(lits[0].polarity);
    }
}
