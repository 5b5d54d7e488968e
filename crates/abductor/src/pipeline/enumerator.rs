//! Breadth-first hypothesis enumeration by depth

use super::{LhsEnumerator, Observation};
use crate::config::{EnumeratorConfig, GraphConfig};
use crate::error::Result;
use crate::graph::{NodeIdx, ProofGraph};
use crate::kb::KnowledgeBase;
use crate::logic::{Axiom, AxiomId};
use crate::timeout::Timeout;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Adds the observation at depth 0, then chains every applicable axiom
/// from the nodes of each depth in turn.
#[derive(Debug, Clone, Default)]
pub struct DepthBasedEnumerator {
    config: EnumeratorConfig,
}

/// Why enumeration stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Timeout,
    NodeLimit,
}

impl DepthBasedEnumerator {
    pub fn new(config: EnumeratorConfig) -> Self {
        DepthBasedEnumerator { config }
    }

    pub fn config(&self) -> &EnumeratorConfig {
        &self.config
    }

    /// Build the graph for `observation`
    pub fn enumerate(
        &self,
        kb: &Arc<KnowledgeBase>,
        config: &GraphConfig,
        observation: &Observation,
        timeout: &Timeout,
    ) -> ProofGraph {
        let mut graph = ProofGraph::new(Arc::clone(kb), config.clone());
        graph.add_attribute("observation", &observation.name);

        for parsed in &observation.literals {
            let lit = graph.literal(parsed);
            graph.add_observation(lit, 0);
        }
        if !observation.requirements.is_empty() {
            let lits = observation
                .requirements
                .iter()
                .map(|r| graph.literal(r))
                .collect();
            graph.add_requirement(lits, false);
        }

        let mut depth = 0;
        let halt = loop {
            if self.config.max_depth.map_or(false, |max| depth >= max) {
                break None;
            }
            let frontier = graph.search_nodes_with_depth(depth).to_vec();
            if frontier.is_empty() {
                break None;
            }
            debug!(depth, nodes = frontier.len(), "expanding depth");
            if let Err(halt) = self.expand(&mut graph, &frontier, timeout) {
                break Some(halt);
            }
            depth += 1;
        };

        match halt {
            Some(Halt::Timeout) => warn!(observation = %observation.name, "hypothesis generation timed out"),
            Some(Halt::NodeLimit) => debug!("node limit reached"),
            None => {}
        }
        info!(
            observation = %observation.name,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            hypernodes = graph.hypernodes().len(),
            max_depth = graph.max_depth().unwrap_or(0),
            "hypotheses enumerated"
        );
        graph
    }

    fn expand(&self, graph: &mut ProofGraph, frontier: &[NodeIdx], timeout: &Timeout) -> std::result::Result<(), Halt> {
        let kb = Arc::clone(graph.kb());
        for &pivot in frontier {
            let node = graph.node(pivot);
            if node.is_equality_node() || node.is_non_equality_node() {
                continue;
            }
            let predicate = node.literal().predicate;
            if self.config.backward_chaining {
                for &id in kb.axioms_with_right(predicate) {
                    self.apply(graph, pivot, id, true, timeout)?;
                }
            }
            if self.config.forward_chaining {
                for &id in kb.axioms_with_left(predicate) {
                    self.apply(graph, pivot, id, false, timeout)?;
                }
            }
        }
        Ok(())
    }

    /// Chain `axiom` on every target tuple that includes `pivot`
    fn apply(
        &self,
        graph: &mut ProofGraph,
        pivot: NodeIdx,
        axiom: AxiomId,
        backward: bool,
        timeout: &Timeout,
    ) -> std::result::Result<(), Halt> {
        let kb = Arc::clone(graph.kb());
        let axiom = kb.axiom(axiom);
        for tuple in self.target_tuples(graph, pivot, axiom, backward) {
            if timeout.has_timed_out() {
                return Err(Halt::Timeout);
            }
            if self.config.max_nodes.map_or(false, |max| graph.nodes().len() >= max) {
                return Err(Halt::NodeLimit);
            }
            graph.chain(&tuple, axiom.id, backward);
        }
        Ok(())
    }

    /// Node tuples matching the source side of `axiom` that contain
    /// `pivot`, are pairwise distinct and may coexist
    fn target_tuples(&self, graph: &ProofGraph, pivot: NodeIdx, axiom: &Axiom, backward: bool) -> Vec<Vec<NodeIdx>> {
        let source = axiom.source_side(backward);
        let pivot_lit = graph.node(pivot).literal();
        let mut out = Vec::new();

        for (k, template) in source.iter().enumerate() {
            if template.predicate != pivot_lit.predicate
                || template.polarity != pivot_lit.polarity
                || template.arity() != pivot_lit.arity()
            {
                continue;
            }
            let slots: Vec<Vec<NodeIdx>> = source
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    if i == k {
                        return vec![pivot];
                    }
                    graph
                        .search_nodes_with_predicate_id(t.predicate)
                        .iter()
                        .copied()
                        .filter(|&n| {
                            let lit = graph.node(n).literal();
                            lit.polarity == t.polarity && lit.arity() == t.arity()
                        })
                        .collect()
                })
                .collect();

            for tuple in cartesian(&slots) {
                if !all_distinct(&tuple) || !graph.check_coexistability(&tuple) {
                    continue;
                }
                let depth = graph.depth_of_deepest_node(&tuple).unwrap_or(0) + 1;
                if self.config.max_depth.map_or(false, |max| depth > max) {
                    continue;
                }
                if !out.contains(&tuple) {
                    out.push(tuple);
                }
            }
        }
        out
    }
}

impl LhsEnumerator for DepthBasedEnumerator {
    fn name(&self) -> &str {
        "depth"
    }

    fn execute(
        &self,
        kb: &Arc<KnowledgeBase>,
        config: &GraphConfig,
        observation: &Observation,
        timeout: &Timeout,
    ) -> Result<ProofGraph> {
        Ok(self.enumerate(kb, config, observation, timeout))
    }
}

fn cartesian(slots: &[Vec<NodeIdx>]) -> Vec<Vec<NodeIdx>> {
    let mut out: Vec<Vec<NodeIdx>> = vec![Vec::new()];
    for slot in slots {
        out = out
            .iter()
            .flat_map(|prefix| {
                slot.iter().map(move |&n| {
                    let mut next = prefix.clone();
                    next.push(n);
                    next
                })
            })
            .collect();
    }
    out
}

fn all_distinct(tuple: &[NodeIdx]) -> bool {
    tuple
        .iter()
        .enumerate()
        .all(|(i, n)| !tuple[..i].contains(n))
}
