//! JSON serialization types for proof graphs

use crate::graph::{EdgeType, NodeType, ProofGraph};
use crate::kb::PredicateNames;
use crate::logic::{Literal, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON representation of a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { name: String },
}

impl TermJson {
    pub fn from_term(term: &Term) -> Self {
        match term {
            Term::Variable(v) => TermJson::Variable {
                name: v.name.to_string(),
            },
            Term::Constant(c) => TermJson::Constant {
                name: c.name.to_string(),
            },
        }
    }
}

/// JSON representation of a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralJson {
    pub predicate: String,
    pub arity: usize,
    pub polarity: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub args: Vec<TermJson>,
}

impl LiteralJson {
    pub fn from_literal<N: PredicateNames + ?Sized>(lit: &Literal, names: &N) -> Self {
        let (name, arity) = names.predicate_name(lit.predicate);
        LiteralJson {
            predicate: name.to_string(),
            arity,
            polarity: lit.polarity,
            args: lit.terms.iter().map(TermJson::from_term).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    pub index: usize,
    pub literal: LiteralJson,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: usize,
    pub distance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_hypernode: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parents: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeJson {
    pub index: usize,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub tail: usize,
    pub head: usize,
    /// Axiom name for chain edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axiom: Option<String>,
    /// Equality assumptions of unification edges, as `x=y`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unifier: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualExclusionJson {
    pub nodes: (usize, usize),
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub condition: Vec<String>,
}

/// Complete JSON dump of a proof graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofGraphJson {
    pub nodes: Vec<NodeJson>,
    pub hypernodes: Vec<Vec<usize>>,
    pub edges: Vec<EdgeJson>,
    pub observations: Vec<usize>,
    pub mutual_exclusions: Vec<MutualExclusionJson>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, String>,
}

fn unifier_strings<'a>(pairs: impl Iterator<Item = &'a (Term, Term)>) -> Vec<String> {
    pairs.map(|(x, y)| format!("{}={}", x, y)).collect()
}

/// Render a proof graph with predicate and axiom names resolved
pub fn graph_to_json(graph: &ProofGraph) -> ProofGraphJson {
    let kb = graph.kb();
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| NodeJson {
            index: n.index(),
            literal: LiteralJson::from_literal(n.literal(), graph),
            node_type: n.node_type(),
            depth: n.depth(),
            distance: n.distance(),
            master_hypernode: n.master_hypernode(),
            parents: n.parents().iter().copied().collect(),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(i, e)| EdgeJson {
            index: i,
            edge_type: e.edge_type(),
            tail: e.tail(),
            head: e.head(),
            axiom: e.axiom().map(|id| kb.axiom(id).name.clone()),
            unifier: graph
                .unifier_of_edge(i)
                .map(|u| unifier_strings(u.substitutions()))
                .unwrap_or_default(),
        })
        .collect();

    let mutual_exclusions = graph
        .mutual_exclusion_table()
        .iter()
        .map(|(&nodes, uni)| MutualExclusionJson {
            nodes,
            condition: unifier_strings(uni.substitutions()),
        })
        .collect();

    ProofGraphJson {
        nodes,
        hypernodes: graph.hypernodes().to_vec(),
        edges,
        observations: graph.observation_indices().to_vec(),
        mutual_exclusions,
        attributes: graph.attributes().clone(),
    }
}

/// `graph_to_json` serialized as a string
pub fn graph_to_json_string(graph: &ProofGraph, pretty: bool) -> serde_json::Result<String> {
    let json = graph_to_json(graph);
    if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
}
