//! Terms of the literal language
//!
//! Terms are atomic: there are no function symbols. A term is either a
//! variable or a constant, and both carry a shared name so that cloning a
//! term never allocates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: Arc<str>,
}

/// A constant symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constant {
    pub name: Arc<str>,
}

/// An atomic term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Variable { name: Arc::from(name) }
    }
}

impl Constant {
    pub fn new(name: &str) -> Self {
        Constant { name: Arc::from(name) }
    }
}

impl Term {
    /// Create a variable term
    pub fn variable(name: &str) -> Self {
        Term::Variable(Variable::new(name))
    }

    /// Create a constant term
    pub fn constant(name: &str) -> Self {
        Term::Constant(Constant::new(name))
    }

    /// Create a term from a bare name using the TPTP convention:
    /// an upper-case or `_` initial makes a variable, anything else a constant.
    pub fn from_name(name: &str) -> Self {
        if is_variable_name(name) {
            Term::variable(name)
        } else {
            Term::constant(name)
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Term::Variable(v) => &v.name,
            Term::Constant(c) => &c.name,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }
}

/// True if `name` would be read as a variable
pub fn is_variable_name(name: &str) -> bool {
    name.chars()
        .next()
        .map_or(false, |c| c.is_uppercase() || c == '_')
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_variable_name(&self.name) {
            write!(f, "'{}'", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
        }
    }
}
