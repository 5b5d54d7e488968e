//! Nodes of the proof graph

use super::edge::HypernodeIdx;
use crate::logic::Literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dense index of a node. Stable for the lifetime of the graph.
pub type NodeIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Part of the observation
    Observable,
    /// Produced by chaining or by an equality assumption
    Hypothesis,
}

/// A literal placed in the graph
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) index: NodeIdx,
    pub(crate) literal: Literal,
    pub(crate) node_type: NodeType,
    pub(crate) depth: usize,
    pub(crate) equality: bool,
    pub(crate) master_hypernode: Option<HypernodeIdx>,
    pub(crate) parents: BTreeSet<NodeIdx>,
    pub(crate) ancestors: BTreeSet<NodeIdx>,
    pub(crate) relatives: BTreeSet<NodeIdx>,
    pub(crate) distance: f32,
}

impl Node {
    pub fn index(&self) -> NodeIdx {
        self.index
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The hypernode this node was created in, if any
    pub fn master_hypernode(&self) -> Option<HypernodeIdx> {
        self.master_hypernode
    }

    /// Targets of the step that created this node
    pub fn parents(&self) -> &BTreeSet<NodeIdx> {
        &self.parents
    }

    /// Transitive closure of `parents`
    pub fn ancestors(&self) -> &BTreeSet<NodeIdx> {
        &self.ancestors
    }

    /// Other nodes created by the same chaining step
    pub fn relatives(&self) -> &BTreeSet<NodeIdx> {
        &self.relatives
    }

    /// Accumulated axiom distance from the observation
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// An affirmed `=` literal
    pub fn is_equality_node(&self) -> bool {
        self.equality && self.literal.polarity
    }

    /// A negated `=` literal
    pub fn is_non_equality_node(&self) -> bool {
        self.equality && !self.literal.polarity
    }

    /// An equality assumption that was not produced by chaining
    pub fn is_transitive_equality_node(&self) -> bool {
        self.is_equality_node() && self.master_hypernode.is_none()
    }
}
