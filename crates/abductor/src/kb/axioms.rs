//! Axiom store with predicate reverse indices

use super::predicates::PredicateId;
use crate::error::{AbductorError, Result};
use crate::logic::{Axiom, AxiomId, Literal};
use std::collections::HashMap;

/// All axioms of a knowledge base, indexed by the predicates on each side.
///
/// Lookups by predicate are a single map probe and do not depend on how
/// many axioms are stored.
#[derive(Debug, Clone, Default)]
pub struct AxiomStore {
    axioms: Vec<Axiom>,
    by_left: HashMap<PredicateId, Vec<AxiomId>>,
    by_right: HashMap<PredicateId, Vec<AxiomId>>,
    num_unnamed: u64,
}

impl AxiomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axiom and index it. Returns its id.
    pub fn add(
        &mut self,
        name: Option<&str>,
        left: Vec<Literal>,
        right: Vec<Literal>,
        cost: Option<f32>,
    ) -> Result<AxiomId> {
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => self.name_of_unnamed_axiom(),
        };
        if left.is_empty() || right.is_empty() {
            return Err(AbductorError::InvalidAxiom {
                name,
                reason: "both sides must contain at least one literal".to_string(),
            });
        }
        if let Some(c) = cost {
            if !(c >= 0.0) {
                return Err(AbductorError::InvalidAxiom {
                    name,
                    reason: format!("cost must be a non-negative number, got {}", c),
                });
            }
        }

        let id = self.axioms.len();
        index_side(&mut self.by_left, &left, id);
        index_side(&mut self.by_right, &right, id);
        self.axioms.push(Axiom {
            id,
            name,
            left,
            right,
            cost,
        });
        Ok(id)
    }

    /// # Panics
    /// Panics if `id` was not returned by this store.
    pub fn get(&self, id: AxiomId) -> &Axiom {
        &self.axioms[id]
    }

    pub fn find(&self, id: AxiomId) -> Option<&Axiom> {
        self.axioms.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Axiom> {
        self.axioms.iter().find(|a| a.name == name)
    }

    /// Axioms with `predicate` on their left-hand side (forward candidates)
    pub fn axioms_with_left(&self, predicate: PredicateId) -> &[AxiomId] {
        self.by_left.get(&predicate).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Axioms with `predicate` on their right-hand side (backward candidates)
    pub fn axioms_with_right(&self, predicate: PredicateId) -> &[AxiomId] {
        self.by_right.get(&predicate).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    fn name_of_unnamed_axiom(&mut self) -> String {
        let name = format!("_{:#010x}", self.num_unnamed);
        self.num_unnamed += 1;
        name
    }
}

fn index_side(map: &mut HashMap<PredicateId, Vec<AxiomId>>, side: &[Literal], id: AxiomId) {
    for lit in side {
        let ids = map.entry(lit.predicate).or_default();
        // an axiom mentioning a predicate twice is listed once
        if ids.last() != Some(&id) {
            ids.push(id);
        }
    }
}
