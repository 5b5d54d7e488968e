//! Mutual exclusion between nodes
//!
//! Two literals are mutually exclusive when they cannot both hold under
//! the condition recorded with the pair (a unifier of aligned terms). The
//! sources are:
//! - declared exclusions between affirmed predicates, on the declared
//!   argument positions
//! - a literal and its negation
//! - an asymmetric functional predicate applied with swapped arguments

use super::node::NodeIdx;
use super::ProofGraph;
use crate::kb::{RelationProperty, TermIdx};
use crate::logic::Literal;
use crate::unification::Unifier;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Symmetric relation over node pairs, each carrying its condition
#[derive(Debug, Clone, Default)]
pub struct MutualExclusionTable {
    entries: IndexMap<(NodeIdx, NodeIdx), Unifier>,
    partners: HashMap<NodeIdx, Vec<NodeIdx>>,
}

impl MutualExclusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n1` and `n2` as exclusive. The first condition recorded for
    /// a pair is kept.
    pub fn insert(&mut self, n1: NodeIdx, n2: NodeIdx, unifier: Unifier) {
        let key = ordered(n1, n2);
        if self.entries.contains_key(&key) {
            return;
        }
        self.entries.insert(key, unifier);
        self.partners.entry(n1).or_default().push(n2);
        if n1 != n2 {
            self.partners.entry(n2).or_default().push(n1);
        }
    }

    pub fn find(&self, n1: NodeIdx, n2: NodeIdx) -> Option<&Unifier> {
        self.entries.get(&ordered(n1, n2))
    }

    pub fn contains(&self, n1: NodeIdx, n2: NodeIdx) -> bool {
        self.entries.contains_key(&ordered(n1, n2))
    }

    /// Nodes exclusive with `node`, in insertion order
    pub fn partners(&self, node: NodeIdx) -> &[NodeIdx] {
        self.partners.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Entries keyed by `(smaller, larger)` node index, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&(NodeIdx, NodeIdx), &Unifier)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ordered(n1: NodeIdx, n2: NodeIdx) -> (NodeIdx, NodeIdx) {
    if n1 <= n2 {
        (n1, n2)
    } else {
        (n2, n1)
    }
}

/// Unify the aligned positions of two literals.
///
/// Returns `None` when the alignment identifies two distinct constants,
/// directly or through a variable aligned twice, i.e. the literals can
/// never refer to the same arguments.
fn align(lhs: &Literal, rhs: &Literal, positions: &[(TermIdx, TermIdx)]) -> Option<Unifier> {
    let mut uni = Unifier::new();
    for &(i, j) in positions {
        let (a, b) = (lhs.terms.get(i)?, rhs.terms.get(j)?);
        if !uni.unify_terms(a, b, |_, _| false) {
            return None;
        }
    }
    Some(uni)
}

impl ProofGraph {
    /// Existing nodes that cannot coexist with `literal`, each paired with
    /// the condition under which the exclusion holds
    pub fn mutual_exclusions(&self, literal: &Literal) -> Vec<(NodeIdx, Unifier)> {
        let mut out = Vec::new();
        if Some(literal.predicate) == self.kb.predicates().equality() {
            return out;
        }
        let registry = self.kb.predicates();

        // declared exclusions
        if literal.polarity {
            for &partner in registry.exclusive_partners(literal.predicate) {
                let positions = match registry.declared_exclusion(literal.predicate, partner) {
                    Some(p) => p,
                    None => continue,
                };
                for &n in self.search_nodes_with_predicate_id(partner) {
                    let other = &self.nodes[n].literal;
                    if !other.polarity {
                        continue;
                    }
                    if let Some(uni) = align(literal, other, &positions) {
                        out.push((n, uni));
                    }
                }
            }
        }

        let identity: Vec<(TermIdx, TermIdx)> = (0..literal.arity()).map(|i| (i, i)).collect();
        let asymmetric = literal.arity() == 2
            && registry
                .functional_config(literal.predicate)
                .map_or(false, |c| c.has(RelationProperty::Asymmetric));

        for &n in self.search_nodes_with_predicate_id(literal.predicate) {
            let other = &self.nodes[n].literal;
            if other.arity() != literal.arity() {
                continue;
            }
            if other.polarity != literal.polarity {
                // negation
                if let Some(uni) = align(literal, other, &identity) {
                    out.push((n, uni));
                }
            } else if asymmetric && literal.polarity {
                if let Some(uni) = align(literal, other, &[(0, 1), (1, 0)]) {
                    out.push((n, uni));
                }
            }
        }
        out
    }

    /// False iff some pair of `nodes` is mutually exclusive
    pub fn check_coexistability(&self, nodes: &[NodeIdx]) -> bool {
        for (i, &n1) in nodes.iter().enumerate() {
            for &n2 in &nodes[..i] {
                if self.exclusions.contains(n1, n2) {
                    return false;
                }
            }
        }
        true
    }

    /// The condition under which `n1` and `n2` exclude each other
    pub fn search_mutual_exclusion_of_node(&self, n1: NodeIdx, n2: NodeIdx) -> Option<&Unifier> {
        self.exclusions.find(n1, n2)
    }

    pub fn mutual_exclusion_table(&self) -> &MutualExclusionTable {
        &self.exclusions
    }

    pub(crate) fn generate_mutual_exclusions(&mut self, idx: NodeIdx) {
        if self.nodes[idx].equality {
            return;
        }
        let found = self.mutual_exclusions(&self.nodes[idx].literal);
        for (n, uni) in found {
            if n == idx {
                continue;
            }
            self.trace_exclusion(idx, n, &uni);
            self.exclusions.insert(idx, n, uni);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Term;

    #[test]
    fn test_table_is_symmetric() {
        let mut table = MutualExclusionTable::new();
        table.insert(3, 1, Unifier::new());
        assert!(table.contains(1, 3));
        assert!(table.find(3, 1).is_some());
        assert_eq!(table.partners(1), &[3]);
        assert_eq!(table.partners(3), &[1]);
        assert_eq!(table.iter().next().map(|(k, _)| *k), Some((1, 3)));
    }

    #[test]
    fn test_first_condition_is_kept() {
        let mut table = MutualExclusionTable::new();
        let x = Term::variable("X");
        let a = Term::constant("a");
        table.insert(0, 1, Unifier::from_pairs([(&x, &a)]));
        table.insert(1, 0, Unifier::new());
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(0, 1).map(|u| u.len()), Some(1));
    }

    #[test]
    fn test_align_rejects_distinct_constants() {
        use crate::kb::PredicateId;
        let p = PredicateId(0);
        let lhs = Literal::positive(p, vec![Term::constant("a"), Term::variable("X")]);
        let rhs = Literal::positive(p, vec![Term::constant("b"), Term::constant("c")]);
        assert!(align(&lhs, &rhs, &[(0, 0)]).is_none());
        let uni = align(&lhs, &rhs, &[(1, 1)]).unwrap();
        assert_eq!(uni.find_substitution_term(&Term::variable("X")), Some(&Term::constant("c")));
    }

    #[test]
    fn test_align_follows_repeated_variables() {
        use crate::kb::PredicateId;
        let p = PredicateId(0);
        let x = Term::variable("X");
        let lhs = Literal::positive(p, vec![x.clone(), x.clone()]);
        let rhs = Literal::positive(p, vec![Term::constant("a"), Term::constant("b")]);
        let both = [(0, 0), (1, 1)];
        assert!(align(&lhs, &rhs, &both).is_none());
        assert!(align(&rhs, &lhs, &both).is_none());

        let same = Literal::positive(p, vec![Term::constant("a"), Term::constant("a")]);
        let uni = align(&lhs, &same, &both).unwrap();
        assert_eq!(uni.len(), 1);
        assert_eq!(uni.resolve(&x), &Term::constant("a"));
    }
}
