//! Reverse indices of the proof graph
//!
//! Every list is in ascending index order because handles are appended
//! monotonically; an entry is pushed at most once per key.

use super::edge::{EdgeIdx, HypernodeIdx};
use super::node::NodeIdx;
use crate::kb::PredicateId;
use crate::logic::Term;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default)]
pub(crate) struct GraphMaps {
    pub term_to_nodes: HashMap<Term, Vec<NodeIdx>>,
    pub predicate_to_nodes: HashMap<PredicateId, Vec<NodeIdx>>,
    pub depth_to_nodes: HashMap<usize, Vec<NodeIdx>>,
    pub node_to_hypernodes: HashMap<NodeIdx, Vec<HypernodeIdx>>,
    /// Edges by tail hypernode
    pub hypernode_to_edges: HashMap<HypernodeIdx, Vec<EdgeIdx>>,
    /// Edges by head hypernode
    pub head_hypernode_to_edges: HashMap<HypernodeIdx, Vec<EdgeIdx>>,
    pub head_node_to_edges: HashMap<NodeIdx, Vec<EdgeIdx>>,
    pub tail_node_to_edges: HashMap<NodeIdx, Vec<EdgeIdx>>,
    /// Sorted node list of each hypernode
    pub unordered_nodes_to_hypernode: HashMap<Vec<NodeIdx>, HypernodeIdx>,
}

impl GraphMaps {
    pub fn index_node(&mut self, idx: NodeIdx, predicate: PredicateId, terms: &[Term], depth: usize) {
        push_unique(&mut self.predicate_to_nodes, predicate, idx);
        push_unique(&mut self.depth_to_nodes, depth, idx);
        for term in terms {
            push_unique(&mut self.term_to_nodes, term.clone(), idx);
        }
    }

    pub fn index_hypernode(&mut self, idx: HypernodeIdx, nodes: &[NodeIdx]) {
        for &n in nodes {
            push_unique(&mut self.node_to_hypernodes, n, idx);
        }
        self.unordered_nodes_to_hypernode.insert(sorted_key(nodes), idx);
    }

    pub fn index_edge(&mut self, idx: EdgeIdx, tail: (HypernodeIdx, &[NodeIdx]), head: (HypernodeIdx, &[NodeIdx])) {
        push_unique(&mut self.hypernode_to_edges, tail.0, idx);
        push_unique(&mut self.head_hypernode_to_edges, head.0, idx);
        for &n in tail.1 {
            push_unique(&mut self.tail_node_to_edges, n, idx);
        }
        for &n in head.1 {
            push_unique(&mut self.head_node_to_edges, n, idx);
        }
    }
}

pub(crate) fn sorted_key(nodes: &[NodeIdx]) -> Vec<NodeIdx> {
    let mut key = nodes.to_vec();
    key.sort_unstable();
    key
}

pub(crate) fn lookup<'a, K: Eq + Hash, V>(map: &'a HashMap<K, Vec<V>>, key: &K) -> &'a [V] {
    map.get(key).map(|v| v.as_slice()).unwrap_or(&[])
}

fn push_unique<K: Eq + Hash, V: PartialEq + Copy>(map: &mut HashMap<K, Vec<V>>, key: K, value: V) {
    let list = map.entry(key).or_default();
    if list.last() != Some(&value) {
        list.push(value);
    }
}
