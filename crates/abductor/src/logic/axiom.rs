//! Implication rules

use super::literal::Literal;
use crate::kb::PredicateNames;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense index of an axiom in the axiom store
pub type AxiomId = usize;

/// An implication `left => right`.
///
/// The same axiom is read left-to-right for forward chaining (deduction) and
/// right-to-left for backward chaining (abduction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axiom {
    pub id: AxiomId,
    pub name: String,
    pub left: Vec<Literal>,
    pub right: Vec<Literal>,
    /// Cost attached in the knowledge base, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f32>,
}

impl Axiom {
    /// The side that is matched against existing nodes
    pub fn source_side(&self, backward: bool) -> &[Literal] {
        if backward {
            &self.right
        } else {
            &self.left
        }
    }

    /// The side that is instantiated into new nodes
    pub fn destination_side(&self, backward: bool) -> &[Literal] {
        if backward {
            &self.left
        } else {
            &self.right
        }
    }

    pub fn display<'a, N: PredicateNames + ?Sized>(&'a self, names: &'a N) -> AxiomDisplay<'a, N> {
        AxiomDisplay { axiom: self, names }
    }
}

pub struct AxiomDisplay<'a, N: ?Sized> {
    axiom: &'a Axiom,
    names: &'a N,
}

impl<'a, N: PredicateNames + ?Sized> fmt::Display for AxiomDisplay<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.axiom.name)?;
        write_conjunction(f, &self.axiom.left, self.names)?;
        write!(f, " => ")?;
        write_conjunction(f, &self.axiom.right, self.names)
    }
}

fn write_conjunction<N: PredicateNames + ?Sized>(
    f: &mut fmt::Formatter<'_>,
    literals: &[Literal],
    names: &N,
) -> fmt::Result {
    for (i, lit) in literals.iter().enumerate() {
        if i > 0 {
            write!(f, " & ")?;
        }
        write!(f, "{}", lit.display(names))?;
    }
    Ok(())
}
