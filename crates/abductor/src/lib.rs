//! Abductor: hypothesis-graph construction for abductive inference
//!
//! Given an observation (a conjunction of literals) and a knowledge base of
//! implication rules, this library builds the proof graph of candidate
//! explanations by backward chaining (abduction), forward chaining
//! (deduction) and unification. Choosing the best explanation from the
//! graph is left to an ILP converter and solver plugged into a `Session`.

pub mod config;
pub mod error;
pub mod graph;
pub mod json;
pub mod kb;
pub mod logic;
pub mod pipeline;
pub mod timeout;
pub mod unification;

pub use config::{EnumeratorConfig, GraphConfig, KnowledgeBaseConfig, SessionConfig, Verbosity};
pub use error::{AbductorError, Result};

pub use logic::{
    parse_conjunction, parse_literal, parse_rule, Axiom, AxiomId, Constant, Literal,
    ParsedLiteral, ParsedRule, Term, Variable,
};

pub use kb::{
    DistanceCache, DistanceProvider, DistanceSpec, FunctionalConfig, KnowledgeBase,
    KnowledgeBaseBuilder, PredicateId, PredicateNames, PredicateRegistry, RelationProperty,
};

pub use unification::{UnifiableVariableClusterSet, Unifier};

pub use graph::{
    Edge, EdgeIdx, EdgeType, HypernodeIdx, MutualExclusionTable, Node, NodeIdx, NodeType,
    ProofGraph, Requirement, TermDistance,
};

pub use pipeline::{
    DepthBasedEnumerator, IlpConverter, IlpProblem, IlpSolution, IlpSolver, LhsEnumerator,
    Observation, Session, SolutionStatus,
};

pub use json::{graph_to_json, graph_to_json_string, ProofGraphJson};
pub use timeout::Timeout;
