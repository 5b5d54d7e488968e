//! Inference session: owns the pipeline components and the products of the
//! last inference

use super::{IlpConverter, IlpProblem, IlpSolution, IlpSolver, LhsEnumerator, Observation};
use crate::config::SessionConfig;
use crate::error::{AbductorError, Result};
use crate::graph::ProofGraph;
use crate::kb::KnowledgeBase;
use crate::timeout::Timeout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Wall-clock time spent in each stage of the last inference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub lhs: Duration,
    pub ilp: Duration,
    pub sol: Duration,
    pub all: Duration,
}

pub struct Session {
    kb: Arc<KnowledgeBase>,
    config: SessionConfig,

    enumerator: Option<Box<dyn LhsEnumerator>>,
    converter: Option<Box<dyn IlpConverter>>,
    solver: Option<Box<dyn IlpSolver>>,

    graph: Option<ProofGraph>,
    problem: Option<IlpProblem>,
    solutions: Vec<IlpSolution>,
    timings: StageTimings,
}

impl Session {
    pub fn new(kb: Arc<KnowledgeBase>, config: SessionConfig) -> Self {
        Session {
            kb,
            config,
            enumerator: None,
            converter: None,
            solver: None,
            graph: None,
            problem: None,
            solutions: Vec::new(),
            timings: StageTimings::default(),
        }
    }

    pub fn kb(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // === Components ===

    /// Install the hypothesis generator, dropping the previous one
    pub fn set_enumerator(&mut self, enumerator: Box<dyn LhsEnumerator>) {
        self.enumerator = Some(enumerator);
    }

    pub fn set_converter(&mut self, converter: Box<dyn IlpConverter>) {
        self.converter = Some(converter);
    }

    pub fn set_solver(&mut self, solver: Box<dyn IlpSolver>) {
        self.solver = Some(solver);
    }

    pub fn enumerator(&self) -> Option<&dyn LhsEnumerator> {
        self.enumerator.as_deref()
    }

    pub fn converter(&self) -> Option<&dyn IlpConverter> {
        self.converter.as_deref()
    }

    pub fn solver(&self) -> Option<&dyn IlpSolver> {
        self.solver.as_deref()
    }

    // === Parameters and flags ===

    pub fn set_param(&mut self, key: &str, value: &str) {
        self.config.params.insert(key.to_string(), value.to_string());
    }

    pub fn erase_param(&mut self, key: &str) {
        self.config.params.remove(key);
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.config.params.get(key).map(String::as_str)
    }

    /// `key` parsed as an integer, or `default` if absent or malformed
    pub fn param_int(&self, key: &str, default: i64) -> i64 {
        self.param(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn param_float(&self, key: &str, default: f32) -> f32 {
        self.param(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn set_flag(&mut self, key: &str) {
        self.config.flags.insert(key.to_string());
    }

    pub fn erase_flag(&mut self, key: &str) {
        self.config.flags.remove(key);
    }

    pub fn flag(&self, key: &str) -> bool {
        self.config.flags.contains(key)
    }

    // === Observation filters ===

    pub fn add_target(&mut self, name: &str) {
        self.config.targets.insert(name.to_string());
    }

    pub fn clear_targets(&mut self) {
        self.config.targets.clear();
    }

    /// True if `name` should be inferred; with no targets every name is
    pub fn is_target(&self, name: &str) -> bool {
        self.config.targets.is_empty() || self.config.targets.contains(name)
    }

    pub fn add_exclusion(&mut self, name: &str) {
        self.config.excluded.insert(name.to_string());
    }

    pub fn clear_exclusions(&mut self) {
        self.config.excluded.clear();
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.config.excluded.contains(name)
    }

    // === Inference ===

    /// Fails naming the first missing component
    pub fn check_validity(&self) -> Result<()> {
        if self.enumerator.is_none() {
            return Err(AbductorError::MissingComponent("lhs_enumerator"));
        }
        if self.converter.is_none() {
            return Err(AbductorError::MissingComponent("ilp_converter"));
        }
        if self.solver.is_none() {
            return Err(AbductorError::MissingComponent("ilp_solver"));
        }
        Ok(())
    }

    /// Run generation, conversion and solving on `observation`.
    ///
    /// Returns `Ok(false)` without doing anything if the observation is
    /// filtered out by the target or exclusion lists.
    pub fn infer(&mut self, observation: &Observation) -> Result<bool> {
        if !self.is_target(&observation.name) || self.is_excluded(&observation.name) {
            info!(observation = %observation.name, "observation skipped");
            return Ok(false);
        }
        self.check_validity()?;
        self.reset_for_inference();

        let (enumerator, converter, solver) = match (&self.enumerator, &self.converter, &self.solver) {
            (Some(e), Some(c), Some(s)) => (e, c, s),
            _ => return Err(AbductorError::MissingComponent("pipeline component")),
        };
        let start = Instant::now();
        let total = Timeout::new(self.config.total_timeout());

        let t = Instant::now();
        let timeout = total.min(self.config.lhs_timeout());
        let graph = enumerator.execute(&self.kb, &self.config.graph, observation, &timeout)?;
        self.timings.lhs = t.elapsed();
        if timeout.has_timed_out() {
            warn!(observation = %observation.name, "hypothesis generation hit its time limit");
        }
        if total.has_timed_out() {
            self.graph = Some(graph);
            return Err(AbductorError::Timeout("ilp conversion"));
        }

        let t = Instant::now();
        let timeout = total.min(self.config.ilp_timeout());
        let problem = converter.execute(&graph, &timeout)?;
        self.timings.ilp = t.elapsed();
        self.graph = Some(graph);
        if total.has_timed_out() {
            self.problem = Some(problem);
            return Err(AbductorError::Timeout("solving"));
        }

        let t = Instant::now();
        let timeout = total.min(self.config.sol_timeout());
        let solutions = solver.execute(&problem, &timeout)?;
        self.timings.sol = t.elapsed();
        self.problem = Some(problem);
        self.solutions = solutions;
        self.timings.all = start.elapsed();

        info!(
            observation = %observation.name,
            lhs_ms = self.timings.lhs.as_millis() as u64,
            ilp_ms = self.timings.ilp.as_millis() as u64,
            sol_ms = self.timings.sol.as_millis() as u64,
            solutions = self.solutions.len(),
            "inference finished"
        );
        Ok(true)
    }

    fn reset_for_inference(&mut self) {
        self.graph = None;
        self.problem = None;
        self.solutions.clear();
        self.timings = StageTimings::default();
    }

    // === Products ===

    /// The proof graph of the last inference
    pub fn graph(&self) -> Option<&ProofGraph> {
        self.graph.as_ref()
    }

    pub fn problem(&self) -> Option<&IlpProblem> {
        self.problem.as_ref()
    }

    pub fn solutions(&self) -> &[IlpSolution] {
        &self.solutions
    }

    pub fn timings(&self) -> StageTimings {
        self.timings
    }
}
