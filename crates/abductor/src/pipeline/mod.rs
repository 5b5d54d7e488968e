//! Inference pipeline: hypothesis generation, ILP conversion, solving
//!
//! Only generation is implemented in this crate. Conversion and solving are
//! pluggable components behind `IlpConverter` and `IlpSolver`; the problem
//! they exchange is opaque here.

pub mod enumerator;
pub mod session;

pub use enumerator::DepthBasedEnumerator;
pub use session::{Session, StageTimings};

use crate::config::GraphConfig;
use crate::error::Result;
use crate::graph::ProofGraph;
use crate::kb::KnowledgeBase;
use crate::logic::{parse_conjunction, ParsedLiteral};
use crate::timeout::Timeout;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A named observation to explain
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub literals: Vec<ParsedLiteral>,
    /// Literals the explanation is required to contain
    pub requirements: Vec<ParsedLiteral>,
}

impl Observation {
    pub fn new(name: &str, literals: Vec<ParsedLiteral>) -> Self {
        Observation {
            name: name.to_string(),
            literals,
            requirements: Vec::new(),
        }
    }

    /// Parse an observation written as a conjunction, e.g. `p(a) & q(a, X)`
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        Ok(Self::new(name, parse_conjunction(text)?))
    }

    pub fn with_requirements(mut self, text: &str) -> Result<Self> {
        self.requirements = parse_conjunction(text)?;
        Ok(self)
    }
}

/// Builds a proof graph for an observation
pub trait LhsEnumerator: Send {
    fn name(&self) -> &str;

    /// Generation stops early, keeping what was built, once `timeout`
    /// expires
    fn execute(
        &self,
        kb: &Arc<KnowledgeBase>,
        config: &GraphConfig,
        observation: &Observation,
        timeout: &Timeout,
    ) -> Result<ProofGraph>;
}

/// Translates a finished proof graph into an ILP problem
pub trait IlpConverter: Send {
    fn name(&self) -> &str;

    fn execute(&self, graph: &ProofGraph, timeout: &Timeout) -> Result<IlpProblem>;
}

/// Solves an ILP problem
pub trait IlpSolver: Send {
    fn name(&self) -> &str;

    fn execute(&self, problem: &IlpProblem, timeout: &Timeout) -> Result<Vec<IlpSolution>>;
}

/// An ILP problem whose content is owned by the converter that built it
pub struct IlpProblem {
    name: String,
    num_variables: usize,
    payload: Box<dyn Any + Send + Sync>,
}

impl IlpProblem {
    pub fn new(name: &str, num_variables: usize, payload: impl Any + Send + Sync) -> Self {
        IlpProblem {
            name: name.to_string(),
            num_variables,
            payload: Box::new(payload),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// The converter's representation, if it is a `T`
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for IlpProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlpProblem")
            .field("name", &self.name)
            .field("num_variables", &self.num_variables)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    SubOptimal,
    NotAvailable,
}

/// Values of the ILP variables, indexed like the problem's variables
#[derive(Debug, Clone, PartialEq)]
pub struct IlpSolution {
    pub status: SolutionStatus,
    pub objective: Option<f64>,
    pub values: Vec<f64>,
}

impl IlpSolution {
    pub fn not_available(problem: &IlpProblem) -> Self {
        IlpSolution {
            status: SolutionStatus::NotAvailable,
            objective: None,
            values: vec![0.0; problem.num_variables()],
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != SolutionStatus::NotAvailable
    }
}
