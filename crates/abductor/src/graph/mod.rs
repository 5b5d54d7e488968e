//! Proof graph: the space of candidate hypotheses
//!
//! Nodes, hypernodes and edges live in dense append-only arrays and are
//! referred to by index. Indices are never reused or renumbered, so the
//! ILP conversion stage can hold on to them.
//!
//! The graph shares a read-only `KnowledgeBase` through an `Arc`. Several
//! graphs may be built over one knowledge base concurrently; each graph
//! has a single writer.

pub mod chain;
pub mod edge;
pub mod exclusion;
mod maps;
pub mod node;
pub mod unify;

pub use edge::{Edge, EdgeIdx, EdgeType, HypernodeIdx};
pub use exclusion::MutualExclusionTable;
pub use node::{Node, NodeIdx, NodeType};
pub use unify::{NoTermDistance, TermDistance};

use crate::config::{GraphConfig, Verbosity};
use crate::kb::{split_arity_str, KnowledgeBase, PredicateId, PredicateNames};
use crate::logic::{AxiomId, Literal, ParsedLiteral, Term};
use crate::unification::{UnifiableVariableClusterSet, Unifier};
use maps::{lookup, sorted_key, GraphMaps};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Literals the final explanation is required to contain
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub literals: Vec<Literal>,
    /// Gold-standard requirement used for training
    pub is_gold: bool,
}

pub struct ProofGraph {
    kb: Arc<KnowledgeBase>,
    config: GraphConfig,
    term_distance: Box<dyn TermDistance>,

    nodes: Vec<Node>,
    hypernodes: Vec<Vec<NodeIdx>>,
    edges: Vec<Edge>,
    observations: Vec<NodeIdx>,
    requirements: Vec<Requirement>,

    exclusions: MutualExclusionTable,
    unifiers: HashMap<EdgeIdx, Unifier>,
    unification_hypernodes: HashSet<HypernodeIdx>,
    clusters: UnifiableVariableClusterSet,
    maps: GraphMaps,

    /// Head created for each (ordered targets, axiom, backward) application
    applied_chains: HashMap<(Vec<NodeIdx>, AxiomId, bool), HypernodeIdx>,
    considered_unifications: HashSet<(NodeIdx, NodeIdx)>,
    /// Transitive equality node of each unordered term pair
    equality_nodes: HashMap<(Term, Term), NodeIdx>,
    num_fresh_variables: usize,

    /// Predicates seen in observations but unknown to the knowledge base
    local_predicates: Vec<(String, usize)>,
    local_lookup: HashMap<(String, usize), PredicateId>,

    attributes: BTreeMap<String, String>,
}

impl ProofGraph {
    /// Create a new empty graph over `kb`
    pub fn new(kb: Arc<KnowledgeBase>, config: GraphConfig) -> Self {
        ProofGraph {
            kb,
            config,
            term_distance: Box::new(NoTermDistance),
            nodes: Vec::new(),
            hypernodes: Vec::new(),
            edges: Vec::new(),
            observations: Vec::new(),
            requirements: Vec::new(),
            exclusions: MutualExclusionTable::new(),
            unifiers: HashMap::new(),
            unification_hypernodes: HashSet::new(),
            clusters: UnifiableVariableClusterSet::new(),
            maps: GraphMaps::default(),
            applied_chains: HashMap::new(),
            considered_unifications: HashSet::new(),
            equality_nodes: HashMap::new(),
            num_fresh_variables: 0,
            local_predicates: Vec::new(),
            local_lookup: HashMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Use `distance` to decide soft unification of distinct constants
    pub fn with_term_distance(mut self, distance: impl TermDistance + 'static) -> Self {
        self.term_distance = Box::new(distance);
        self
    }

    pub fn kb(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // === Construction ===

    /// Add an observed literal at `depth`. Mutual exclusions and
    /// unification assumptions against existing nodes are computed
    /// immediately.
    pub fn add_observation(&mut self, literal: Literal, depth: usize) -> NodeIdx {
        let idx = self.add_node(
            literal,
            NodeType::Observable,
            depth,
            BTreeSet::new(),
            BTreeSet::new(),
            0.0,
        );
        self.trace_nodes(&[idx]);
        self.generate_mutual_exclusions(idx);
        self.generate_unification_assumptions(idx);
        self.observations.push(idx);
        idx
    }

    pub fn add_requirement(&mut self, literals: Vec<Literal>, is_gold: bool) {
        self.requirements.push(Requirement { literals, is_gold });
    }

    /// Record a provenance attribute; the last value for a name wins
    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Id of `name/arity`, from the knowledge base or, for predicates it
    /// does not know, from this graph's own table
    pub fn predicate_id(&mut self, name: &str, arity: usize) -> PredicateId {
        if let Some(id) = self.find_predicate(name, arity) {
            return id;
        }
        let id = PredicateId((self.kb.predicates().len() + self.local_predicates.len()) as u32);
        self.local_predicates.push((name.to_string(), arity));
        self.local_lookup.insert((name.to_string(), arity), id);
        id
    }

    pub fn find_predicate(&self, name: &str, arity: usize) -> Option<PredicateId> {
        self.kb
            .predicates()
            .find(name, arity)
            .or_else(|| self.local_lookup.get(&(name.to_string(), arity)).copied())
    }

    /// Resolve a parsed literal, registering unknown predicates locally
    pub fn literal(&mut self, parsed: &ParsedLiteral) -> Literal {
        let id = self.predicate_id(&parsed.predicate, parsed.terms.len());
        Literal::new(id, parsed.terms.clone(), parsed.polarity)
    }

    pub(crate) fn add_node(
        &mut self,
        literal: Literal,
        node_type: NodeType,
        depth: usize,
        parents: BTreeSet<NodeIdx>,
        ancestors: BTreeSet<NodeIdx>,
        distance: f32,
    ) -> NodeIdx {
        let index = self.nodes.len();
        let equality = literal.is_equality(self.kb.predicates());
        self.maps.index_node(index, literal.predicate, &literal.terms, depth);
        for term in &literal.terms {
            if term.is_variable() {
                self.clusters.add_term(term);
            }
        }
        self.nodes.push(Node {
            index,
            literal,
            node_type,
            depth,
            equality,
            master_hypernode: None,
            parents,
            ancestors,
            relatives: BTreeSet::new(),
            distance,
        });
        index
    }

    /// Return the hypernode holding exactly `nodes` (in any order),
    /// creating it if needed
    pub(crate) fn add_hypernode(&mut self, nodes: &[NodeIdx]) -> HypernodeIdx {
        if let Some(idx) = self.find_hypernode_with_unordered_nodes(nodes) {
            return idx;
        }
        let idx = self.hypernodes.len();
        self.hypernodes.push(nodes.to_vec());
        self.maps.index_hypernode(idx, nodes);
        idx
    }

    pub(crate) fn add_edge(&mut self, edge: Edge) -> EdgeIdx {
        let idx = self.edges.len();
        self.maps.index_edge(
            idx,
            (edge.tail, &self.hypernodes[edge.tail]),
            (edge.head, &self.hypernodes[edge.head]),
        );
        self.edges.push(edge);
        idx
    }

    // === Accessors ===

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// # Panics
    /// Panics if `idx` is out of range.
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// # Panics
    /// Panics if `idx` is out of range.
    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx]
    }

    pub fn hypernodes(&self) -> &[Vec<NodeIdx>] {
        &self.hypernodes
    }

    /// # Panics
    /// Panics if `idx` is out of range.
    pub fn hypernode(&self, idx: HypernodeIdx) -> &[NodeIdx] {
        &self.hypernodes[idx]
    }

    /// Observation nodes in insertion order
    pub fn observation_indices(&self) -> &[NodeIdx] {
        &self.observations
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn variable_clusters(&self) -> &UnifiableVariableClusterSet {
        &self.clusters
    }

    // === Lookups ===

    pub fn search_nodes_with_term(&self, term: &Term) -> &[NodeIdx] {
        lookup(&self.maps.term_to_nodes, term)
    }

    pub fn search_nodes_with_predicate_id(&self, predicate: PredicateId) -> &[NodeIdx] {
        lookup(&self.maps.predicate_to_nodes, &predicate)
    }

    pub fn search_nodes_with_predicate(&self, name: &str, arity: usize) -> &[NodeIdx] {
        match self.find_predicate(name, arity) {
            Some(id) => self.search_nodes_with_predicate_id(id),
            None => &[],
        }
    }

    /// Nodes whose predicate is written `name/arity`
    pub fn search_nodes_with_arity(&self, arity: &str) -> &[NodeIdx] {
        match split_arity_str(arity) {
            Some((name, num)) => self.search_nodes_with_predicate(name, num),
            None => &[],
        }
    }

    pub fn search_nodes_with_depth(&self, depth: usize) -> &[NodeIdx] {
        lookup(&self.maps.depth_to_nodes, &depth)
    }

    /// Edges whose tail is `idx`
    pub fn search_edges_with_hypernode(&self, idx: HypernodeIdx) -> &[EdgeIdx] {
        lookup(&self.maps.hypernode_to_edges, &idx)
    }

    pub fn search_edges_with_node_in_head(&self, idx: NodeIdx) -> &[EdgeIdx] {
        lookup(&self.maps.head_node_to_edges, &idx)
    }

    pub fn search_edges_with_node_in_tail(&self, idx: NodeIdx) -> &[EdgeIdx] {
        lookup(&self.maps.tail_node_to_edges, &idx)
    }

    pub fn search_hypernodes_with_node(&self, idx: NodeIdx) -> &[HypernodeIdx] {
        lookup(&self.maps.node_to_hypernodes, &idx)
    }

    pub fn find_hypernode_with_unordered_nodes(&self, nodes: &[NodeIdx]) -> Option<HypernodeIdx> {
        self.maps
            .unordered_nodes_to_hypernode
            .get(&sorted_key(nodes))
            .copied()
    }

    /// The chain edge that created hypernode `idx`
    pub fn find_parental_edge(&self, idx: HypernodeIdx) -> Option<EdgeIdx> {
        lookup(&self.maps.head_hypernode_to_edges, &idx)
            .iter()
            .copied()
            .find(|&e| self.edges[e].is_chain_edge())
    }

    /// The tail of the chain edge that created hypernode `idx`
    pub fn find_parental_hypernode(&self, idx: HypernodeIdx) -> Option<HypernodeIdx> {
        self.find_parental_edge(idx).map(|e| self.edges[e].tail)
    }

    /// Terms known to be unifiable with `term`, including itself
    pub fn find_variable_cluster(&self, term: &Term) -> Vec<Term> {
        self.clusters.cluster_members(term)
    }

    /// Deepest depth among the nodes of hypernode `idx`
    pub fn get_depth_of_deepest_node(&self, idx: HypernodeIdx) -> Option<usize> {
        self.depth_of_deepest_node(self.hypernode(idx))
    }

    pub fn depth_of_deepest_node(&self, nodes: &[NodeIdx]) -> Option<usize> {
        nodes.iter().map(|&n| self.nodes[n].depth).max()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.nodes.iter().map(|n| n.depth).max()
    }

    pub fn is_equality_node(&self, idx: NodeIdx) -> bool {
        self.nodes[idx].is_equality_node()
    }

    pub fn is_transitive_equality_node(&self, idx: NodeIdx) -> bool {
        self.nodes[idx].is_transitive_equality_node()
    }

    // === Formatting ===

    pub fn node_string(&self, idx: NodeIdx) -> String {
        format!("{}:{}", self.nodes[idx].literal.display(self), idx)
    }

    pub(crate) fn trace_nodes(&self, nodes: &[NodeIdx]) {
        if !self.config.verbosity.at_least(Verbosity::Detailed) {
            return;
        }
        for &n in nodes {
            debug!(node = %self.node_string(n), depth = self.nodes[n].depth, "node added");
        }
    }

    pub(crate) fn trace_exclusion(&self, n1: NodeIdx, n2: NodeIdx, uni: &Unifier) {
        if self.config.verbosity.at_least(Verbosity::Full) {
            trace!(
                left = %self.node_string(n1),
                right = %self.node_string(n2),
                condition = %uni,
                "mutual exclusion"
            );
        }
    }
}

impl PredicateNames for ProofGraph {
    fn predicate_name(&self, id: PredicateId) -> (&str, usize) {
        let base = self.kb.predicates().len();
        match (id.as_u32() as usize).checked_sub(base) {
            Some(i) if i < self.local_predicates.len() => {
                let (name, arity) = &self.local_predicates[i];
                (name.as_str(), *arity)
            }
            _ => self.kb.predicates().to_predicate(id),
        }
    }
}

impl fmt::Debug for ProofGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofGraph")
            .field("nodes", &self.nodes.len())
            .field("hypernodes", &self.hypernodes.len())
            .field("edges", &self.edges.len())
            .field("mutual_exclusions", &self.exclusions.len())
            .finish()
    }
}
