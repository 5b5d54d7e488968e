//! Unification assumptions between nodes

use super::edge::{Edge, EdgeIdx, EdgeType, HypernodeIdx};
use super::node::{NodeIdx, NodeType};
use super::ProofGraph;
use crate::logic::{Literal, Term};
use crate::unification::Unifier;
use tracing::debug;

/// Semantic distance between two constants, consulted for soft
/// unification
pub trait TermDistance: Send + Sync {
    fn distance(&self, a: &Term, b: &Term) -> f32;
}

/// Every pair of distinct terms is infinitely far apart
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermDistance;

impl TermDistance for NoTermDistance {
    fn distance(&self, _a: &Term, _b: &Term) -> f32 {
        f32::INFINITY
    }
}

impl<F> TermDistance for F
where
    F: Fn(&Term, &Term) -> f32 + Send + Sync,
{
    fn distance(&self, a: &Term, b: &Term) -> f32 {
        self(a, b)
    }
}

impl ProofGraph {
    /// Existing nodes `node` may be unified with.
    ///
    /// A candidate has the same predicate, polarity and arity, is neither
    /// an ancestor nor a descendant of `node`, has not been considered
    /// with it before, and all its terms are mergeable with those of
    /// `node`.
    pub fn unification_candidates(&self, node: NodeIdx) -> Vec<NodeIdx> {
        let this = &self.nodes[node];
        if this.equality {
            return Vec::new();
        }
        self.search_nodes_with_predicate_id(this.literal.predicate)
            .iter()
            .copied()
            .filter(|&other| other != node)
            .filter(|&other| self.unifier_between(node, other).is_some())
            .collect()
    }

    /// The unifier that would merge `node` into `other`, if the pair is
    /// a valid candidate
    fn unifier_between(&self, node: NodeIdx, other: NodeIdx) -> Option<Unifier> {
        let (a, b) = (&self.nodes[node], &self.nodes[other]);
        if a.literal.polarity != b.literal.polarity
            || a.literal.arity() != b.literal.arity()
            || a.ancestors.contains(&other)
            || b.ancestors.contains(&node)
            || self.considered_unifications.contains(&ordered(node, other))
        {
            return None;
        }
        self.try_unify(&a.literal, &b.literal)
    }

    /// Position-wise unifier of two literals, replacing terms of `this`
    /// with those of `other`.
    ///
    /// Bindings made at earlier positions carry over, so `p(X, X)` does not
    /// unify with `p(a, b)` unless `a` and `b` are close enough to soft
    /// unify.
    fn try_unify(&self, this: &Literal, other: &Literal) -> Option<Unifier> {
        let threshold = self.config.soft_unification_threshold;
        let soft = |a: &Term, b: &Term| threshold > 0.0 && self.term_distance.distance(a, b) <= threshold;
        let mut uni = Unifier::new();
        for (x, y) in this.terms.iter().zip(&other.terms) {
            if !uni.unify_terms(x, y, soft) {
                return None;
            }
        }
        Some(uni)
    }

    /// Create a unification edge for every candidate of `idx`
    pub(crate) fn generate_unification_assumptions(&mut self, idx: NodeIdx) {
        if self.nodes[idx].equality {
            return;
        }
        for other in self.unification_candidates(idx) {
            let uni = match self.unifier_between(idx, other) {
                Some(uni) => uni,
                None => continue,
            };
            self.considered_unifications.insert(ordered(idx, other));
            self.add_unification(idx, other, uni);
        }
    }

    fn add_unification(&mut self, this: NodeIdx, other: NodeIdx, uni: Unifier) -> EdgeIdx {
        let tail = self.add_hypernode(&[other]);
        let head = self.add_hypernode(&[this]);
        let edge = self.add_edge(Edge {
            edge_type: EdgeType::Unification,
            tail,
            head,
            axiom: None,
        });
        self.unification_hypernodes.insert(head);

        debug!(edge, this, other, unifier = %uni, "unification assumed");

        let depth = self.nodes[this].depth.max(self.nodes[other].depth);
        let cost = self.nodes[this].distance.max(self.nodes[other].distance);
        for (x, y) in uni.substitutions() {
            self.add_transitive_equality(x, y, depth, cost);
        }
        self.unifiers.insert(edge, uni);
        edge
    }

    /// Add the equality node `x = y` unless one exists for the pair, and
    /// merge the terms' clusters
    pub(crate) fn add_transitive_equality(&mut self, x: &Term, y: &Term, depth: usize, cost: f32) -> NodeIdx {
        self.clusters.add(x, y);
        let key = if x <= y {
            (x.clone(), y.clone())
        } else {
            (y.clone(), x.clone())
        };
        if let Some(&n) = self.equality_nodes.get(&key) {
            return n;
        }
        let literal = Literal::positive(self.kb.equality_predicate(), vec![x.clone(), y.clone()]);
        let n = self.add_node(literal, NodeType::Hypothesis, depth, Default::default(), Default::default(), cost);
        self.equality_nodes.insert(key, n);
        n
    }

    /// The unifier stored on a unification edge
    pub fn unifier_of_edge(&self, edge: EdgeIdx) -> Option<&Unifier> {
        self.unifiers.get(&edge)
    }

    /// True if `idx` is the head of some unification edge
    pub fn is_hypernode_for_unification(&self, idx: HypernodeIdx) -> bool {
        self.unification_hypernodes.contains(&idx)
    }

    pub fn threshold_distance_for_soft_unifying(&self) -> f32 {
        self.config.soft_unification_threshold
    }
}

fn ordered(a: NodeIdx, b: NodeIdx) -> (NodeIdx, NodeIdx) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
