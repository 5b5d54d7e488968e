//! Edges between hypernodes

use crate::logic::AxiomId;
use serde::{Deserialize, Serialize};

pub type EdgeIdx = usize;
pub type HypernodeIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Abduction: the tail was explained by the head
    BackwardChain,
    /// Deduction: the head follows from the tail
    ForwardChain,
    Unification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub(crate) edge_type: EdgeType,
    pub(crate) tail: HypernodeIdx,
    pub(crate) head: HypernodeIdx,
    pub(crate) axiom: Option<AxiomId>,
}

impl Edge {
    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn tail(&self) -> HypernodeIdx {
        self.tail
    }

    pub fn head(&self) -> HypernodeIdx {
        self.head
    }

    /// Axiom applied by a chain edge; `None` for unification edges
    pub fn axiom(&self) -> Option<AxiomId> {
        self.axiom
    }

    pub fn is_chain_edge(&self) -> bool {
        matches!(self.edge_type, EdgeType::BackwardChain | EdgeType::ForwardChain)
    }

    pub fn is_unify_edge(&self) -> bool {
        self.edge_type == EdgeType::Unification
    }
}
