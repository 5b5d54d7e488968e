//! Literals (predicate applied to terms, with polarity)

use super::term::Term;
use crate::kb::{PredicateId, PredicateNames, PredicateRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal. Two literals are equal iff predicate, polarity and terms are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub predicate: PredicateId,
    pub terms: Vec<Term>,
    pub polarity: bool, // true = affirmed, false = negated
}

impl Literal {
    pub fn new(predicate: PredicateId, terms: Vec<Term>, polarity: bool) -> Self {
        Literal {
            predicate,
            terms,
            polarity,
        }
    }

    /// Create a new affirmed literal
    pub fn positive(predicate: PredicateId, terms: Vec<Term>) -> Self {
        Literal::new(predicate, terms, true)
    }

    /// Create a new negated literal
    pub fn negative(predicate: PredicateId, terms: Vec<Term>) -> Self {
        Literal::new(predicate, terms, false)
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// Get the complement of this literal
    pub fn complement(&self) -> Literal {
        Literal {
            predicate: self.predicate,
            terms: self.terms.clone(),
            polarity: !self.polarity,
        }
    }

    /// True if this is an `=` literal of either polarity
    pub fn is_equality(&self, registry: &PredicateRegistry) -> bool {
        Some(self.predicate) == registry.equality()
    }

    /// Format this literal with anything that can resolve predicate names
    pub fn display<'a, N: PredicateNames + ?Sized>(&'a self, names: &'a N) -> LiteralDisplay<'a, N> {
        LiteralDisplay {
            literal: self,
            names,
        }
    }
}

/// Display wrapper for Literal that resolves the predicate name
pub struct LiteralDisplay<'a, N: ?Sized> {
    literal: &'a Literal,
    names: &'a N,
}

impl<'a, N: PredicateNames + ?Sized> fmt::Display for LiteralDisplay<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, _) = self.names.predicate_name(self.literal.predicate);
        if name == "=" && self.literal.terms.len() == 2 {
            let op = if self.literal.polarity { "=" } else { "!=" };
            return write!(
                f,
                "{} {} {}",
                self.literal.terms[0], op, self.literal.terms[1]
            );
        }
        if !self.literal.polarity {
            write!(f, "!")?;
        }
        write!(f, "{}(", name)?;
        for (i, term) in self.literal.terms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", term)?;
        }
        write!(f, ")")
    }
}

// Shows raw predicate ids, for debugging without a registry
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "!")?;
        }
        write!(f, "{}(", self.predicate)?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", term)?;
        }
        write!(f, ")")
    }
}
