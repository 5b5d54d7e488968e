//! Applying axioms to nodes
//!
//! `chain` matches the source side of an axiom against the target nodes and
//! instantiates the destination side as new hypothesis nodes:
//!
//! ```text
//! backward:  targets ~ axiom.right   =>  new nodes from axiom.left
//! forward:   targets ~ axiom.left    =>  new nodes from axiom.right
//! ```
//!
//! Axiom variables live in their own scope. A template variable is bound to
//! the first graph term it meets; meeting a second, different term turns
//! into an equality assumption unless both terms are constants.
//!
//! Two distinct constants forced together always reject the application.
//! Declared exclusions are not consulted here; they only feed the mutual
//! exclusion table (see `exclusion`).
//!
//! Targets are matched position by position, so the same nodes in another
//! order are a different application. They share the unordered tail
//! hypernode but get their own head.

use super::edge::{Edge, EdgeType, HypernodeIdx};
use super::node::{NodeIdx, NodeType};
use super::ProofGraph;
use crate::logic::{Axiom, AxiomId, Literal, Term};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Why an axiom could not be applied to a set of targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainRejection {
    ArityMismatch,
    LiteralMismatch,
    ConstantClash,
    MaxDistance,
}

/// Bindings of axiom variables to graph terms for one application
#[derive(Debug, Default)]
struct Binding {
    map: HashMap<Term, Term>,
    assumptions: Vec<(Term, Term)>,
}

impl Binding {
    /// Match a template literal against a graph literal
    fn unify(&mut self, template: &Literal, target: &Literal) -> Result<(), ChainRejection> {
        if template.predicate != target.predicate
            || template.polarity != target.polarity
            || template.arity() != target.arity()
        {
            return Err(ChainRejection::LiteralMismatch);
        }
        for (t, g) in template.terms.iter().zip(&target.terms) {
            match t {
                Term::Constant(_) => match g {
                    Term::Constant(_) if g != t => return Err(ChainRejection::ConstantClash),
                    Term::Constant(_) => {}
                    Term::Variable(_) => self.assume(g, t),
                },
                Term::Variable(_) => match self.map.get(t) {
                    None => {
                        self.map.insert(t.clone(), g.clone());
                    }
                    Some(prev) if prev == g => {}
                    Some(prev) if prev.is_constant() && g.is_constant() => {
                        return Err(ChainRejection::ConstantClash)
                    }
                    Some(prev) => {
                        let prev = prev.clone();
                        self.assume(g, &prev);
                    }
                },
            }
        }
        Ok(())
    }

    fn assume(&mut self, x: &Term, y: &Term) {
        let pair = (x.clone(), y.clone());
        if !self.assumptions.contains(&pair) {
            self.assumptions.push(pair);
        }
    }
}

impl ProofGraph {
    /// Apply `axiom` to `targets`, backward (abduction) or forward
    /// (deduction). Returns the head hypernode holding the new nodes, or
    /// `None` if the axiom does not apply.
    ///
    /// Applying the same axiom in the same direction to the same targets,
    /// in the same order, again returns the head created the first time.
    ///
    /// # Panics
    /// Panics if a target or the axiom id is out of range.
    pub fn chain(&mut self, targets: &[NodeIdx], axiom: AxiomId, backward: bool) -> Option<HypernodeIdx> {
        for &t in targets {
            assert!(t < self.nodes.len(), "node index {} out of range", t);
        }
        let kb = Arc::clone(&self.kb);
        let axiom = kb.axiom(axiom);

        if let Some(head) = self.find_applied_chain(targets, axiom.id, backward) {
            return Some(head);
        }

        match self.try_chain(targets, axiom, backward, kb.distance(axiom)) {
            Ok(head) => Some(head),
            Err(reason) => {
                debug!(
                    axiom = %axiom.name,
                    backward,
                    ?targets,
                    ?reason,
                    "axiom not applied"
                );
                None
            }
        }
    }

    pub fn backward_chain(&mut self, targets: &[NodeIdx], axiom: AxiomId) -> Option<HypernodeIdx> {
        self.chain(targets, axiom, true)
    }

    pub fn forward_chain(&mut self, targets: &[NodeIdx], axiom: AxiomId) -> Option<HypernodeIdx> {
        self.chain(targets, axiom, false)
    }

    fn find_applied_chain(&self, targets: &[NodeIdx], axiom: AxiomId, backward: bool) -> Option<HypernodeIdx> {
        self.applied_chains
            .get(&(targets.to_vec(), axiom, backward))
            .copied()
    }

    fn try_chain(
        &mut self,
        targets: &[NodeIdx],
        axiom: &Axiom,
        backward: bool,
        distance: f32,
    ) -> Result<HypernodeIdx, ChainRejection> {
        let source = axiom.source_side(backward);
        if source.len() != targets.len() {
            return Err(ChainRejection::ArityMismatch);
        }

        let mut binding = Binding::default();
        for (template, &t) in source.iter().zip(targets) {
            binding.unify(template, &self.nodes[t].literal)?;
        }

        let base = targets
            .iter()
            .map(|&t| self.nodes[t].distance)
            .fold(0.0f32, f32::max);
        let cost = base + distance;
        if self.kb.exceeds_max_distance(cost) {
            return Err(ChainRejection::MaxDistance);
        }

        // Nothing has been appended up to here.
        let literals: Vec<Literal> = axiom
            .destination_side(backward)
            .iter()
            .map(|lit| self.instantiate(lit, &mut binding.map))
            .collect();

        let depth = targets.iter().map(|&t| self.nodes[t].depth).max().unwrap_or(0) + 1;
        let parents: BTreeSet<NodeIdx> = targets.iter().copied().collect();
        let mut ancestors = parents.clone();
        for &t in targets {
            ancestors.extend(self.nodes[t].ancestors.iter().copied());
        }

        let tail = self.add_hypernode(targets);
        let created: Vec<NodeIdx> = literals
            .into_iter()
            .map(|lit| {
                self.add_node(lit, NodeType::Hypothesis, depth, parents.clone(), ancestors.clone(), cost)
            })
            .collect();
        for &n in &created {
            self.nodes[n].relatives = created.iter().copied().filter(|&m| m != n).collect();
        }

        let head = self.add_hypernode(&created);
        for &n in &created {
            if self.nodes[n].master_hypernode.is_none() {
                self.nodes[n].master_hypernode = Some(head);
            }
        }

        let edge_type = if backward {
            EdgeType::BackwardChain
        } else {
            EdgeType::ForwardChain
        };
        let edge = self.add_edge(Edge {
            edge_type,
            tail,
            head,
            axiom: Some(axiom.id),
        });
        self.applied_chains.insert((targets.to_vec(), axiom.id, backward), head);

        debug!(
            axiom = %axiom.name,
            backward,
            edge,
            tail,
            head,
            depth,
            cost,
            "axiom applied"
        );
        self.trace_nodes(&created);

        for (x, y) in &binding.assumptions {
            self.add_transitive_equality(x, y, depth, cost);
        }
        for &n in &created {
            self.generate_mutual_exclusions(n);
            self.generate_unification_assumptions(n);
        }
        Ok(head)
    }

    /// Substitute bound axiom variables; unbound ones get fresh graph
    /// variables shared across the whole application
    fn instantiate(&mut self, template: &Literal, map: &mut HashMap<Term, Term>) -> Literal {
        let terms = template
            .terms
            .iter()
            .map(|t| {
                if t.is_constant() {
                    return t.clone();
                }
                if let Some(g) = map.get(t) {
                    return g.clone();
                }
                let fresh = self.fresh_variable();
                map.insert(t.clone(), fresh.clone());
                fresh
            })
            .collect();
        Literal::new(template.predicate, terms, template.polarity)
    }

    fn fresh_variable(&mut self) -> Term {
        let term = Term::variable(&format!("_u{}", self.num_fresh_variables));
        self.num_fresh_variables += 1;
        term
    }
}
